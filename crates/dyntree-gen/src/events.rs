use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, SafeBounds};
use dyntree_world::LevelAccess;

/// Notifications published by the generation engine.
#[derive(Clone, Debug, PartialEq)]
pub enum GenEvent {
    /// A tree finished generating; fired after the species' own hook.
    PostGeneration {
        species: String,
        root_pos: BlockPos,
        end_points: Vec<BlockPos>,
        safe_bounds: SafeBounds,
        initial_dirt: Block,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventEnvelope {
    pub id: u64,
    pub kind: GenEvent,
}

type Listener = Box<dyn FnMut(&mut dyn LevelAccess, &EventEnvelope)>;

/// Synchronous event bus. Listeners run in subscription order and may edit
/// the world around the new tree.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&mut dyn LevelAccess, &EventEnvelope) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn post(&mut self, world: &mut dyn LevelAccess, kind: GenEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let env = EventEnvelope { id, kind };
        for listener in self.listeners.iter_mut() {
            listener(world, &env);
        }
        id
    }

    /// Number of events posted so far.
    pub fn posted_count(&self) -> u64 {
        self.next_id
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
