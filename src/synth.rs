//! Deterministic hashing and synthetic tree codes for the forest demo.
use dyntree_code::{CodeCompiler, JoCode};
use dyntree_geom::Direction;

/// Integer hash of a column and seed.
pub fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Uniform value in `[0, 1)` for a column, salted per use.
pub fn rand01(ix: i32, iz: i32, seed: i32, salt: u32) -> f32 {
    let h = hash2(ix, iz, ((seed as u32) ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

/// Small stream of hash-derived choices.
struct Dice(u32);

impl Dice {
    fn roll(&mut self, n: u32) -> u32 {
        self.0 = hash2(self.0 as i32, 0x2545_f491, 0x9E37_79B9);
        self.0 % n.max(1)
    }
}

/// Builds a tree skeleton from `hash`: a trunk of `trunk_min..=trunk_max`
/// steps, a few short side limbs off its upper half, and a two-step crown.
/// Every path stays well under the branch walk depth limit.
pub fn synthesize_code(hash: u32, trunk_min: i32, trunk_max: i32) -> JoCode {
    let mut dice = Dice(hash);
    let lo = trunk_min.clamp(1, 12) as u32;
    let hi = (trunk_max.clamp(1, 12) as u32).max(lo);
    let trunk = lo + dice.roll(hi - lo + 1);
    let mut code = CodeCompiler::new();
    let limb_start = trunk / 2;
    for step in 0..trunk {
        code.add_direction(Direction::Up as i32);
        if step >= limb_start && dice.roll(3) == 0 {
            let dir = Direction::HORIZONTAL[dice.roll(4) as usize];
            code.add_fork();
            for _ in 0..1 + dice.roll(3) {
                code.add_direction(dir as i32);
            }
            if dice.roll(2) == 0 {
                code.add_direction(Direction::Up as i32);
            }
            code.add_return();
        }
    }
    code.add_direction(Direction::Up as i32);
    code.add_direction(Direction::Up as i32);
    JoCode::from_instructions(code.compile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyntree_code::Instruction;
    use proptest::prelude::*;

    #[test]
    fn rand01_is_deterministic() {
        assert_eq!(rand01(3, -7, 42, 1), rand01(3, -7, 42, 1));
        assert_ne!(rand01(3, -7, 42, 1), rand01(3, -7, 42, 2));
    }

    proptest! {
        #[test]
        fn synthesized_codes_are_balanced_and_shallow(hash: u32) {
            let code = synthesize_code(hash, 3, 6);
            let mut open = 0i32;
            let mut depth = 0i32;
            let mut deepest = 0i32;
            let mut stack = Vec::new();
            for i in 0..code.len() {
                match code.instruction_at(i).unwrap() {
                    Instruction::Fork => {
                        open += 1;
                        stack.push(depth);
                    }
                    Instruction::Return => {
                        open -= 1;
                        depth = stack.pop().unwrap();
                    }
                    Instruction::Move(_) => {
                        depth += 1;
                        deepest = deepest.max(depth);
                    }
                }
            }
            prop_assert_eq!(open, 0);
            prop_assert!(deepest < 32);
            prop_assert_eq!(code.instruction_at(0), Some(Instruction::Move(Direction::Up)));
        }
    }
}
