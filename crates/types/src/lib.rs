//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core simulation, terminal rendering, replay tooling).
//!
//! # Level Geometry
//!
//! A level is a set of up to 24 screens. Each screen is a grid of blocks:
//!
//! - **Columns**: 10 blocks (indexed 0-9, left to right)
//! - **Rows**: 3 blocks (indexed 0-2, top to bottom)
//! - **Block index**: `row * 10 + column`, 0..29
//! - **Screen number**: 1..24 (0 means "no screen" in adjacency data)
//!
//! Horizontal positions are measured in bytes (4 per block, 40 per screen),
//! vertical positions in scan lines.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BLOCK_WIDTH` | 4 | Block width in bytes |
//! | `BLOCK_HEIGHT` | 63 | Block height in lines |
//! | `SCREEN_HEIGHT` | 189 | Three rows of blocks |
//! | `BLOCK_BOTTOM` | 55 / 118 / 181 | Floor line of each row |
//! | `TOP_ROW_Y` | -8 | Floor line of the overflow row from the screen above |
//!
//! # Blueprint Layout
//!
//! | Section | Offset | Length |
//! |---------|--------|--------|
//! | BlueType | 0 | 720 |
//! | BlueSpec | 720 | 720 |
//! | LinkLoc | 1440 | 256 |
//! | LinkMap | 1696 | 256 |
//! | Map | 1952 | 96 |
//! | Info | 2048 | 256 |
//!
//! # Examples
//!
//! ```
//! use tui_palace_types::{BlockAddr, ObjectId, RedrawChannel, BLOCKS_PER_SCREEN};
//!
//! let addr = BlockAddr::new(3, 12).unwrap();
//! assert_eq!(addr.column(), 2);
//! assert_eq!(addr.row(), 1);
//! assert_eq!(addr.flat_index(), 2 * BLOCKS_PER_SCREEN + 12);
//!
//! assert_eq!(ObjectId::from_bits(0x2B), Some(ObjectId::LooseFloor));
//! assert_eq!(RedrawChannel::Top.capacity(), 10);
//! ```

/// Number of screens in a level.
pub const SCREEN_COUNT: usize = 24;

/// Blocks per screen row.
pub const BLOCK_COLUMNS: usize = 10;

/// Block rows per screen.
pub const BLOCK_ROWS: usize = 3;

/// Blocks per screen (10 x 3).
pub const BLOCKS_PER_SCREEN: usize = BLOCK_COLUMNS * BLOCK_ROWS;

/// Blocks in a level (24 x 30).
pub const LEVEL_BLOCKS: usize = SCREEN_COUNT * BLOCKS_PER_SCREEN;

/// Block width in bytes.
pub const BLOCK_WIDTH: i16 = 4;

/// Screen width in bytes.
pub const SCREEN_WIDTH: i16 = BLOCK_WIDTH * BLOCK_COLUMNS as i16;

/// Block height in scan lines.
pub const BLOCK_HEIGHT: i16 = 63;

/// Screen height in scan lines.
pub const SCREEN_HEIGHT: i16 = BLOCK_HEIGHT * BLOCK_ROWS as i16;

/// Floor line of each block row.
pub const BLOCK_BOTTOM: [i16; BLOCK_ROWS] = [55, 118, 181];

/// Floor line of the bottom row of the screen above, as seen from the current screen.
pub const TOP_ROW_Y: i16 = BLOCK_BOTTOM[BLOCK_ROWS - 1] - SCREEN_HEIGHT;

/// Mask selecting the object id bits of a BlueType byte.
pub const OBJECT_ID_MASK: u8 = 0x1F;

/// Number of entries in the plate/gate link table.
pub const LINK_TABLE_LEN: usize = 256;

/// Bytes per screen in the adjacency map (left, right, up, down).
pub const MAP_ENTRY_LEN: usize = 4;

pub const BLUETYPE_OFFSET: usize = 0;
pub const BLUESPEC_OFFSET: usize = BLUETYPE_OFFSET + LEVEL_BLOCKS;
pub const LINKLOC_OFFSET: usize = BLUESPEC_OFFSET + LEVEL_BLOCKS;
pub const LINKMAP_OFFSET: usize = LINKLOC_OFFSET + LINK_TABLE_LEN;
pub const MAP_OFFSET: usize = LINKMAP_OFFSET + LINK_TABLE_LEN;
pub const INFO_OFFSET: usize = MAP_OFFSET + SCREEN_COUNT * MAP_ENTRY_LEN;

/// Length of the Info section.
pub const INFO_LEN: usize = 256;

/// Total size of a level blueprint in bytes (2304).
pub const BLUEPRINT_LEN: usize = INFO_OFFSET + INFO_LEN;

/// Default cycle length in milliseconds (about 12 cycles per second).
pub const TICK_MS: u32 = 83;

/// Default redraw count: one pass per display page.
pub const REDRAW_PASSES: u8 = 2;


/// Address of one block in the level: screen 1..24, block 0..29.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockAddr {
    screen: u8,
    block: u8,
}

impl BlockAddr {
    /// Create an address, returning `None` when either component is out of range.
    pub const fn new(screen: u8, block: u8) -> Option<Self> {
        if screen == 0 || screen as usize > SCREEN_COUNT || block as usize >= BLOCKS_PER_SCREEN {
            return None;
        }
        Some(Self { screen, block })
    }

    /// Create an address from a column (0..9) and row (0..2).
    pub const fn from_column_row(screen: u8, column: u8, row: u8) -> Option<Self> {
        if column as usize >= BLOCK_COLUMNS || row as usize >= BLOCK_ROWS {
            return None;
        }
        Self::new(screen, row * BLOCK_COLUMNS as u8 + column)
    }

    pub const fn screen(&self) -> u8 {
        self.screen
    }

    pub const fn block(&self) -> u8 {
        self.block
    }

    pub const fn column(&self) -> u8 {
        self.block % BLOCK_COLUMNS as u8
    }

    pub const fn row(&self) -> u8 {
        self.block / BLOCK_COLUMNS as u8
    }

    /// Index into the 720-entry BlueType/BlueSpec tables.
    pub const fn flat_index(&self) -> usize {
        (self.screen as usize - 1) * BLOCKS_PER_SCREEN + self.block as usize
    }

    /// Left edge of the block in bytes.
    pub const fn x(&self) -> i16 {
        self.column() as i16 * BLOCK_WIDTH
    }

    /// Floor line of the block.
    pub const fn y(&self) -> i16 {
        BLOCK_BOTTOM[self.row() as usize]
    }
}

/// What occupies a block (low 5 bits of a BlueType byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectId {
    Space = 0,
    Floor = 1,
    Spikes = 2,
    Pillar = 3,
    Gate = 4,
    StuckPlate = 5,
    PressPlate = 6,
    PanelWithFloor = 7,
    PillarBottom = 8,
    PillarTop = 9,
    Flask = 10,
    LooseFloor = 11,
    PanelNoFloor = 12,
    Mirror = 13,
    Rubble = 14,
    UpPressPlate = 15,
    Exit = 16,
    Exit2 = 17,
    Slicer = 18,
    Torch = 19,
    Block = 20,
    Bones = 21,
    Sword = 22,
    Window = 23,
    Window2 = 24,
    ArchBottom = 25,
    ArchTop1 = 26,
    ArchTop2 = 27,
    ArchTop3 = 28,
    ArchTop4 = 29,
}

impl ObjectId {
    /// Decode the object id from a BlueType byte; reserved upper bits are ignored.
    ///
    /// Returns `None` for the two unassigned ids (30, 31).
    pub const fn from_bits(bits: u8) -> Option<Self> {
        use ObjectId::*;
        let id = match bits & OBJECT_ID_MASK {
            0 => Space,
            1 => Floor,
            2 => Spikes,
            3 => Pillar,
            4 => Gate,
            5 => StuckPlate,
            6 => PressPlate,
            7 => PanelWithFloor,
            8 => PillarBottom,
            9 => PillarTop,
            10 => Flask,
            11 => LooseFloor,
            12 => PanelNoFloor,
            13 => Mirror,
            14 => Rubble,
            15 => UpPressPlate,
            16 => Exit,
            17 => Exit2,
            18 => Slicer,
            19 => Torch,
            20 => Block,
            21 => Bones,
            22 => Sword,
            23 => Window,
            24 => Window2,
            25 => ArchBottom,
            26 => ArchTop1,
            27 => ArchTop2,
            28 => ArchTop3,
            29 => ArchTop4,
            _ => return None,
        };
        Some(id)
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the block carries a walkable floor a falling object can land on.
    pub const fn has_floor(self) -> bool {
        use ObjectId::*;
        !matches!(
            self,
            Space | PanelNoFloor | PillarTop | Window | Window2 | ArchTop1 | ArchTop2 | ArchTop3
                | ArchTop4 | Block
        )
    }

    /// Solid masonry: falling objects shatter on top of it without leaving rubble.
    pub const fn is_solid(self) -> bool {
        matches!(self, ObjectId::Block)
    }

    /// Whether the BlueSpec byte of this object is a link-table index.
    pub const fn is_plate(self) -> bool {
        matches!(self, ObjectId::PressPlate | ObjectId::UpPressPlate)
    }

    /// Whether the BlueSpec byte of this object is a movable state value.
    pub const fn is_movable(self) -> bool {
        matches!(
            self,
            ObjectId::Gate | ObjectId::Spikes | ObjectId::LooseFloor | ObjectId::Slicer
                | ObjectId::Exit
        )
    }
}

/// Eight independent per-block redraw channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedrawChannel {
    /// Whole block: supersedes `Movable` and `Foreground`.
    General,
    /// Bottom row of the screen above, visible along the top edge (10 entries).
    Top,
    /// Solid-fill clear of the block rectangle.
    Wipe,
    /// Movable portion of the block (gate bars).
    Movable,
    /// Foreground mask.
    Foreground,
    /// Floor mask: supersedes `HalfFloorMask`.
    FloorMask,
    /// Partial (triangular) floor mask.
    HalfFloorMask,
    /// Static object sprite in the block.
    Object,
}

impl RedrawChannel {
    /// All channels in compositor order.
    pub const ALL: [RedrawChannel; 8] = [
        RedrawChannel::General,
        RedrawChannel::Top,
        RedrawChannel::Wipe,
        RedrawChannel::Movable,
        RedrawChannel::Foreground,
        RedrawChannel::FloorMask,
        RedrawChannel::HalfFloorMask,
        RedrawChannel::Object,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Number of addressable entries in this channel.
    pub const fn capacity(self) -> usize {
        match self {
            RedrawChannel::Top => BLOCK_COLUMNS,
            _ => BLOCKS_PER_SCREEN,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RedrawChannel::General => "general",
            RedrawChannel::Top => "top",
            RedrawChannel::Wipe => "wipe",
            RedrawChannel::Movable => "movable",
            RedrawChannel::Foreground => "foreground",
            RedrawChannel::FloorMask => "floor",
            RedrawChannel::HalfFloorMask => "half",
            RedrawChannel::Object => "object",
        }
    }
}

/// Neighbor direction in the screen adjacency map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Offset of this direction inside a 4-byte adjacency entry.
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// Which way a sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    /// Decode a facing byte from level info (0xFF = left, anything else = right).
    pub const fn from_byte(b: u8) -> Self {
        if b == 0xFF {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Sprite set selector for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterIdentity {
    Kid,
    Shadow,
    Guard,
    FatGuard,
    Skeleton,
    Vizier,
    Princess,
    Mouse,
}

impl CharacterIdentity {
    /// One-letter tag used by text renderers.
    pub fn letter(&self) -> char {
        match self {
            CharacterIdentity::Kid => 'K',
            CharacterIdentity::Shadow => 'S',
            CharacterIdentity::Guard => 'G',
            CharacterIdentity::FatGuard => 'F',
            CharacterIdentity::Skeleton => 'X',
            CharacterIdentity::Vizier => 'V',
            CharacterIdentity::Princess => 'P',
            CharacterIdentity::Mouse => 'm',
        }
    }
}

/// Action code reported by the sequence interpreter for a character's current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionCode(pub u8);

impl ActionCode {
    pub const STAND: ActionCode = ActionCode(0);
    pub const ON_GROUND: ActionCode = ActionCode(1);
    pub const HANGING: ActionCode = ActionCode(2);
    pub const MIDAIR: ActionCode = ActionCode(3);
    pub const FREEFALL: ActionCode = ActionCode(4);
    pub const BUMPED: ActionCode = ActionCode(5);
    pub const HANGING_STRAIGHT: ActionCode = ActionCode(6);
    pub const TURNING: ActionCode = ActionCode(7);

    /// Airborne characters are drawn without a floor cutoff.
    pub const fn is_airborne(self) -> bool {
        matches!(self.0, 3 | 4)
    }

    pub const fn is_hanging(self) -> bool {
        matches!(self.0, 2 | 6)
    }
}

/// How an image is combined with what is already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opacity {
    /// Overwrite.
    #[default]
    Store,
    Or,
    Xor,
    And,
    /// Draw through a mask, leaving transparent pixels untouched.
    Mask,
}

/// Image table an [`ImageId`] indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTable {
    /// Static back piece of a block.
    Background,
    /// Movable portion of a block (gate bars, spikes, plate, loose floor).
    Movable,
    /// Foreground piece drawn in front of characters.
    Foreground,
    /// Floor front-edge mask.
    FloorMask,
    /// Triangular partial floor mask.
    HalfFloorMask,
    /// Static object sprites (flask, sword).
    Object,
    /// Falling-floor section sprites.
    Section,
    /// Character sprites; the identity selects the set.
    Character(CharacterIdentity),
    /// Overlay/message glyphs.
    Message,
}

/// Image reference: table, index within the table, and a variant (pattern or state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId {
    pub table: ImageTable,
    pub index: u8,
    pub variant: u8,
}

impl ImageId {
    pub const fn new(table: ImageTable, index: u8, variant: u8) -> Self {
        Self {
            table,
            index,
            variant,
        }
    }
}

/// Commands produced by the demo input layer.
///
/// The core never sees these; the runner translates them into trigger events,
/// screen switches, and cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Move the block cursor.
    Cursor(Direction),
    /// Switch the visible screen through the adjacency map.
    Screen(Direction),
    /// Fire the trigger belonging to the object under the cursor.
    Trigger,
    /// Reload the level and discard all registries.
    Reset,
}

impl ControlCommand {
    /// Parse a command from its script name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_palace_types::{ControlCommand, Direction};
    ///
    /// assert_eq!(ControlCommand::from_str("trigger"), Some(ControlCommand::Trigger));
    /// assert_eq!(
    ///     ControlCommand::from_str("screenLeft"),
    ///     Some(ControlCommand::Screen(Direction::Left))
    /// );
    /// assert_eq!(ControlCommand::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(ControlCommand::Cursor(Direction::Left)),
            "cursorright" => Some(ControlCommand::Cursor(Direction::Right)),
            "cursorup" => Some(ControlCommand::Cursor(Direction::Up)),
            "cursordown" => Some(ControlCommand::Cursor(Direction::Down)),
            "screenleft" => Some(ControlCommand::Screen(Direction::Left)),
            "screenright" => Some(ControlCommand::Screen(Direction::Right)),
            "screenup" => Some(ControlCommand::Screen(Direction::Up)),
            "screendown" => Some(ControlCommand::Screen(Direction::Down)),
            "trigger" => Some(ControlCommand::Trigger),
            "reset" => Some(ControlCommand::Reset),
            _ => None,
        }
    }
}
