use dyntree_blocks::config::{BlockDef, BlocksConfig};
use dyntree_blocks::{Block, BlockKind, BlockRegistry};
use proptest::prelude::*;

fn def(name: &str, kind: BlockKind) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: None,
        kind,
        family: None,
        solid: None,
        replaceable: None,
        tags: Vec::new(),
    }
}

#[test]
fn builtin_table_loads_and_air_is_zero() {
    let reg = BlockRegistry::builtin().expect("builtin registry");
    assert_eq!(reg.id_by_name("air"), Some(0));
    assert!(reg.is_air(Block::AIR));
    let oak = reg.block_by_name("oak_branch").unwrap();
    assert!(reg.is_branch(oak));
    assert_eq!(reg.family_of(oak), Some("oak"));
    assert_eq!(
        reg.find_family_block("oak", BlockKind::Leaves),
        reg.block_by_name("oak_leaves")
    );
    let grass = reg.block_by_name("grass").unwrap();
    assert!(reg.has_tag(grass, "foliage"));
    assert!(reg.is_replaceable(grass));
    assert!(!reg.is_solid(grass));
    assert!(reg.is_rooty(reg.block_by_name("rooty_dirt").unwrap()));
}

#[test]
fn unknown_ids_read_as_solid() {
    let reg = BlockRegistry::builtin().unwrap();
    let bogus = Block::new(9999);
    assert_eq!(reg.kind_of(bogus), BlockKind::Solid);
    assert!(reg.is_solid(bogus));
    assert!(!reg.is_replaceable(bogus));
    assert_eq!(reg.name_of(bogus), "unknown");
}

#[test]
fn rejects_non_air_first_block() {
    let cfg = BlocksConfig {
        blocks: vec![def("stone", BlockKind::Solid)],
    };
    assert!(BlockRegistry::from_configs(cfg).is_err());
}

#[test]
fn rejects_duplicates_and_familyless_branches() {
    let dup = BlocksConfig {
        blocks: vec![def("air", BlockKind::Air), def("air", BlockKind::Air)],
    };
    assert!(BlockRegistry::from_configs(dup).is_err());
    let orphan = BlocksConfig {
        blocks: vec![def("air", BlockKind::Air), def("log", BlockKind::Branch)],
    };
    assert!(BlockRegistry::from_configs(orphan).is_err());
}

#[test]
fn toml_kind_parses_snake_case() {
    let src = r#"
        [[blocks]]
        name = "air"
        kind = "air"

        [[blocks]]
        name = "roots"
        kind = "rooty_soil"
    "#;
    let reg = BlockRegistry::from_toml_str(src).unwrap();
    assert!(reg.is_rooty(Block::new(1)));
}

proptest! {
    // ids are assigned in declaration order
    #[test]
    fn ids_follow_declaration_order(n in 1usize..32) {
        let mut blocks = vec![def("air", BlockKind::Air)];
        for i in 0..n {
            blocks.push(def(&format!("b{i}"), BlockKind::Solid));
        }
        let reg = BlockRegistry::from_configs(BlocksConfig { blocks }).unwrap();
        for i in 0..n {
            prop_assert_eq!(reg.id_by_name(&format!("b{i}")), Some(i as u16 + 1));
        }
    }
}
