use dyntree_blocks::Block;
use dyntree_code::CodeCompiler;
use dyntree_geom::{BlockPos, Direction};
use dyntree_world::LevelAccess;
use hashbrown::HashMap;

use crate::NodeInspector;

#[derive(Debug)]
struct Link {
    // step taken from the parent to reach this node
    dir: Option<Direction>,
    children: Vec<usize>,
}

/// Records the shape of a walked branch network so it can be compiled into
/// an instruction code.
#[derive(Debug, Default)]
pub struct CoderNode {
    links: Vec<Link>,
    index: HashMap<BlockPos, usize>,
}

impl CoderNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.links.len()
    }

    /// Emits the recorded network starting below the first node. Children are
    /// visited in direction order; all but the last are wrapped in a fork.
    pub fn compile(&self) -> Vec<u8> {
        let mut code = CodeCompiler::with_capacity(self.links.len() * 2);
        if !self.links.is_empty() {
            self.compile_children(0, &mut code);
        }
        code.compile()
    }

    fn compile_link(&self, link: usize, code: &mut CodeCompiler) {
        if let Some(dir) = self.links[link].dir {
            code.add_direction(dir as i32);
        }
        self.compile_children(link, code);
    }

    fn compile_children(&self, link: usize, code: &mut CodeCompiler) {
        let mut children = self.links[link].children.clone();
        children.sort_by_key(|&c| self.links[c].dir);
        let n = children.len();
        for (i, child) in children.into_iter().enumerate() {
            if i + 1 < n {
                code.add_fork();
                self.compile_link(child, code);
                code.add_return();
            } else {
                self.compile_link(child, code);
            }
        }
    }
}

impl NodeInspector for CoderNode {
    fn run(
        &mut self,
        world: &mut dyn LevelAccess,
        block: Block,
        pos: BlockPos,
        from_dir: Option<Direction>,
    ) -> bool {
        let is_first = self.links.is_empty();
        if self.index.contains_key(&pos) || !(is_first || world.registry().is_branch(block)) {
            return false;
        }
        let parent = if is_first {
            None
        } else {
            from_dir.and_then(|d| self.index.get(&pos.offset(d)).copied())
        };
        let id = self.links.len();
        self.links.push(Link {
            dir: if is_first { None } else { from_dir.map(Direction::opposite) },
            children: Vec::new(),
        });
        self.index.insert(pos, id);
        if let Some(p) = parent {
            self.links[p].children.push(id);
        }
        false
    }

    fn return_run(
        &mut self,
        _world: &mut dyn LevelAccess,
        _block: Block,
        _pos: BlockPos,
        _from_dir: Option<Direction>,
    ) -> bool {
        false
    }
}
