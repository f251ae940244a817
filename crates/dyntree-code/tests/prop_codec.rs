use dyntree_code::{CodeCompiler, FORK_CODE, JoCode, RETURN_CODE, decode, encode};
use dyntree_geom::Direction;
use proptest::prelude::*;

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn instructions() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..8, 0..64)
}

fn directions() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 0..64)
}

fn facing() -> impl Strategy<Value = Direction> {
    (0u8..6).prop_map(|i| Direction::from_index(i).unwrap())
}

#[test]
fn known_code_decodes() {
    let bytes = decode("JOSP1vJ");
    assert_eq!(bytes, vec![1, 1, 1, 6, 2, 2, 1, 7, 6, 5, 5, 7, 1, 1]);
    assert_eq!(encode(&bytes), "JOSP1vJ");
}

#[test]
fn unknown_characters_are_skipped() {
    assert_eq!(decode("J O-S!P\n1vJ="), decode("JOSP1vJ"));
    assert!(decode("!!!").is_empty());
}

#[test]
fn compiler_round_trips_text() {
    let mut c = CodeCompiler::from_text("JOSP1vJ");
    c.add_direction(9);
    assert_eq!(c.len(), 14);
    c.add_fork();
    c.add_direction(2);
    c.add_return();
    assert_eq!(c.len(), 17);
    let text = c.encode();
    assert_eq!(decode(&text).len(), 18);
    assert_eq!(*decode(&text).last().unwrap(), RETURN_CODE);
    assert_eq!(decode(&text)[14], FORK_CODE);
}

#[test]
fn jocode_displays_as_text() {
    let code: JoCode = "JOSP1vJ".parse().unwrap();
    assert_eq!(code.to_string(), "JOSP1vJ");
    assert!(!code.is_careful());
    assert!(code.with_careful(true).is_careful());
}

proptest! {
    #[test]
    fn even_sequences_round_trip(mut x in directions()) {
        if x.len() % 2 == 1 {
            x.pop();
        }
        prop_assert_eq!(decode(&encode(&x)), x);
    }

    #[test]
    fn odd_sequences_gain_a_return(x in instructions()) {
        prop_assume!(x.len() % 2 == 1);
        let mut expect = x.clone();
        expect.push(RETURN_CODE);
        prop_assert_eq!(decode(&encode(&x)), expect);
    }

    #[test]
    fn encode_uses_alphabet_and_half_length(x in instructions()) {
        let text = encode(&x);
        prop_assert_eq!(text.len(), x.len().div_ceil(2));
        prop_assert!(text.chars().all(|c| ALPHABET.contains(c)));
    }

    #[test]
    fn add_direction_out_of_range_never_appends(d in prop_oneof![i32::MIN..0, 6..i32::MAX]) {
        let mut c = CodeCompiler::new();
        c.add_direction(d);
        prop_assert!(c.is_empty());
    }

    // rotate by a facing, then read back with that same facing
    #[test]
    fn rotation_round_trips_with_matched_facing(x in instructions(), dir in facing()) {
        let mut code = JoCode::from_instructions(x.clone());
        code.rotate(dir);
        code.set_facing(dir);
        let read: Vec<u8> = (0..code.len()).map(|i| code.code_at(i).unwrap()).collect();
        prop_assert_eq!(read, x);
    }

    #[test]
    fn north_rotation_is_identity(x in instructions()) {
        let mut code = JoCode::from_instructions(x.clone());
        code.rotate(Direction::North);
        prop_assert_eq!(code.instructions(), x.as_slice());
    }
}
