//! Mobile objects - free-moving level objects and their per-cycle advance
//!
//! The only mobile object the level produces is the falling floor section a loose
//! floor turns into. A MOB tracks its position in byte/line coordinates, the block
//! row it currently occupies (`level`) and its screen. Each cycle gravity raises its
//! velocity up to a terminal value; when its y reaches the floor line of its row it
//! either lands (the block becomes rubble), shatters on solid masonry, or keeps
//! falling into the next row, crossing to the screen below past row 2. Crossings of
//! any screen edge go through the adjacency map; an object with no neighbour on that
//! side leaves the level.

use crate::error::{ListFull, ListKind};
use crate::handle::{EntryHandle, HandleSeq};
use crate::trans::AnimContext;
use crate::types::{
    BlockAddr, Direction, ObjectId, RedrawChannel, BLOCK_BOTTOM, BLOCK_HEIGHT, BLOCK_ROWS,
    BLOCK_WIDTH, SCREEN_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH,
};

/// Highest line still inside row 0; anything above belongs to the screen above.
const TOP_EDGE: i16 = BLOCK_BOTTOM[0] - BLOCK_HEIGHT;

/// Mobile object type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobType(pub u8);

impl MobType {
    pub const FALLING_FLOOR: MobType = MobType(0);
}

/// Initial fields of a new mobile object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobSpawn {
    pub x: i16,
    pub y: i16,
    pub screen: u8,
    pub velocity: i16,
    pub kind: MobType,
    pub level: u8,
}

/// One mobile object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mob {
    pub handle: EntryHandle,
    /// Left edge in bytes, relative to `screen`.
    pub x: i16,
    /// Bottom line, relative to `screen`.
    pub y: i16,
    pub screen: u8,
    pub velocity: i16,
    pub kind: MobType,
    /// Block row currently occupied (0..2).
    pub level: u8,
    /// Cycle of insertion; the entry is not advanced in that cycle.
    pub born: u64,
}

impl Mob {
    pub fn column(&self) -> u8 {
        (self.x.clamp(0, SCREEN_WIDTH - 1) / BLOCK_WIDTH) as u8
    }

    /// Block the object currently occupies.
    pub fn block(&self) -> Option<BlockAddr> {
        BlockAddr::from_column_row(self.screen, self.column(), self.level)
    }
}

/// How a falling floor ends when it reaches a floor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// The landing block turns into this object.
    Becomes(ObjectId),
    /// The section breaks apart and the block is left unchanged.
    Shatters,
    /// No floor here; keep falling.
    FallsThrough,
}

/// Landing outcome of a falling floor on `object`.
pub fn impact(object: ObjectId) -> Impact {
    match object {
        ObjectId::Floor | ObjectId::LooseFloor | ObjectId::Rubble | ObjectId::Bones => {
            Impact::Becomes(ObjectId::Rubble)
        }
        ObjectId::PressPlate => Impact::Becomes(ObjectId::StuckPlate),
        o if o.is_solid() => Impact::Shatters,
        o if o.has_floor() => Impact::Shatters,
        _ => Impact::FallsThrough,
    }
}

enum Fate {
    Keep,
    Remove,
}

/// Fixed-capacity list of active MOBs.
#[derive(Debug, Clone)]
pub struct MobileRegistry {
    entries: Vec<Mob>,
    capacity: usize,
    handles: HandleSeq,
}

impl MobileRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            handles: HandleSeq::default(),
        }
    }

    /// Add an object. An out-of-range screen, column or row is a caller bug: asserted
    /// in debug builds and clamped into range otherwise.
    pub fn insert(&mut self, spawn: MobSpawn, cycle: u64) -> Result<EntryHandle, ListFull> {
        if self.entries.len() >= self.capacity {
            return Err(ListFull {
                list: ListKind::Mobile,
                capacity: self.capacity,
            });
        }
        let spawn = checked_spawn(spawn);

        let handle = self.handles.issue();
        self.entries.push(Mob {
            handle,
            x: spawn.x,
            y: spawn.y,
            screen: spawn.screen,
            velocity: spawn.velocity,
            kind: spawn.kind,
            level: spawn.level,
            born: cycle,
        });
        Ok(handle)
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&Mob> {
        self.entries.iter().find(|m| m.handle == handle)
    }

    pub fn remove(&mut self, handle: EntryHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|m| m.handle != handle);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mob> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.handles.reset();
    }

    /// Advance every MOB by one cycle; entries inserted this cycle are skipped.
    pub fn advance_all(&mut self, ctx: &mut AnimContext<'_>) {
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].born == ctx.cycle {
                i += 1;
                continue;
            }

            let fate = match self.entries[i].kind {
                MobType::FALLING_FLOOR => advance_falling_floor(&mut self.entries[i], ctx),
                other => {
                    debug_assert!(false, "unknown mob type {}", other.0);
                    log::warn!("mob {:?} has unknown type {}; left as is", self.entries[i].handle, other.0);
                    Fate::Keep
                }
            };

            match fate {
                Fate::Keep => i += 1,
                Fate::Remove => {
                    self.entries.remove(i);
                }
            }
        }
    }
}

fn spawn_in_range(spawn: &MobSpawn) -> bool {
    (1..=SCREEN_COUNT as u8).contains(&spawn.screen)
        && (spawn.level as usize) < BLOCK_ROWS
        && (0..SCREEN_WIDTH).contains(&spawn.x)
}

fn checked_spawn(spawn: MobSpawn) -> MobSpawn {
    if spawn_in_range(&spawn) {
        return spawn;
    }
    debug_assert!(false, "mob spawn out of range: {:?}", spawn);
    log::warn!("clamping out-of-range mob spawn {:?}", spawn);
    MobSpawn {
        x: spawn.x.clamp(0, SCREEN_WIDTH - 1),
        screen: spawn.screen.clamp(1, SCREEN_COUNT as u8),
        level: spawn.level.min(BLOCK_ROWS as u8 - 1),
        ..spawn
    }
}

/// Move across screen edges horizontally; `false` when the object left the level.
fn wrap_horizontal(mob: &mut Mob, ctx: &AnimContext<'_>) -> bool {
    while mob.x < 0 || mob.x >= SCREEN_WIDTH {
        let (dir, shift) = if mob.x < 0 {
            (Direction::Left, SCREEN_WIDTH)
        } else {
            (Direction::Right, -SCREEN_WIDTH)
        };
        match ctx.blueprint.neighbor(mob.screen, dir) {
            Some(s) => {
                mob.screen = s;
                mob.x += shift;
            }
            None => return false,
        }
    }
    true
}

/// Move up into the screen above and follow the row up; `false` when the object left
/// the level.
fn rise(mob: &mut Mob, ctx: &AnimContext<'_>) -> bool {
    while mob.y < TOP_EDGE {
        match ctx.blueprint.neighbor(mob.screen, Direction::Up) {
            Some(above) => {
                mob.screen = above;
                mob.y += SCREEN_HEIGHT;
                mob.level = BLOCK_ROWS as u8 - 1;
            }
            None => return false,
        }
    }
    while mob.level > 0 && mob.y <= BLOCK_BOTTOM[mob.level as usize - 1] {
        mob.level -= 1;
    }
    true
}

fn advance_falling_floor(mob: &mut Mob, ctx: &mut AnimContext<'_>) -> Fate {
    let previous = mob.block();

    let anim = &ctx.config.anim;
    mob.velocity = (mob.velocity + anim.mob_gravity).min(anim.mob_terminal_velocity);
    mob.y += mob.velocity;

    if !wrap_horizontal(mob, ctx) {
        log::debug!("mob {:?} left the level sideways", mob.handle);
        if let Some(p) = previous {
            ctx.mark(p, RedrawChannel::General);
        }
        return Fate::Remove;
    }

    if !rise(mob, ctx) {
        log::debug!("mob {:?} left the level upwards", mob.handle);
        if let Some(p) = previous {
            ctx.mark(p, RedrawChannel::General);
        }
        return Fate::Remove;
    }

    loop {
        if mob.level as usize >= BLOCK_ROWS {
            match ctx.blueprint.neighbor(mob.screen, Direction::Down) {
                Some(below) => {
                    mob.screen = below;
                    mob.y -= SCREEN_HEIGHT;
                    mob.level = 0;
                }
                None => {
                    log::debug!("mob {:?} fell out of the level", mob.handle);
                    if let Some(p) = previous {
                        ctx.mark(p, RedrawChannel::General);
                    }
                    return Fate::Remove;
                }
            }
        }

        if mob.y < BLOCK_BOTTOM[mob.level as usize] {
            break;
        }

        let Some(addr) = mob.block() else {
            return Fate::Remove;
        };

        match impact(ctx.blueprint.object(addr)) {
            Impact::FallsThrough => mob.level += 1,
            Impact::Becomes(object) => {
                ctx.blueprint.set_object(addr, object);
                ctx.blueprint.set_spec(addr, 0);
                ctx.mark(addr, RedrawChannel::General);
                if let Some(p) = previous.filter(|p| *p != addr) {
                    ctx.mark(p, RedrawChannel::General);
                }
                log::debug!("mob {:?} landed at {:?} as {:?}", mob.handle, addr, object);
                return Fate::Remove;
            }
            Impact::Shatters => {
                ctx.mark(addr, RedrawChannel::General);
                if let Some(p) = previous.filter(|p| *p != addr) {
                    ctx.mark(p, RedrawChannel::General);
                }
                log::debug!("mob {:?} shattered at {:?}", mob.handle, addr);
                return Fate::Remove;
            }
        }
    }

    if let Some(p) = previous {
        ctx.mark(p, RedrawChannel::General);
    }
    if let Some(now) = mob.block() {
        ctx.mark(now, RedrawChannel::General);
    }
    Fate::Keep
}
