//! Glyph table: what each image looks like in character cells.
//!
//! Every block image is 4 columns by 3 rows, anchored at its bottom-left cell. Spaces
//! are transparent unless the image is drawn with `Opacity::Store`.

use crate::fb::{CellStyle, Rgb};
use crate::types::{Facing, ImageId, ImageTable, ObjectId};

/// Rows of one image, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub rows: [&'static str; 3],
    pub style: CellStyle,
}

const STONE: CellStyle = CellStyle::fg(Rgb::new(150, 140, 120));
const FLOOR: CellStyle = CellStyle::fg(Rgb::new(190, 170, 130));
const WALL: CellStyle = CellStyle::fg(Rgb::new(95, 90, 85)).dim();
const METAL: CellStyle = CellStyle::fg(Rgb::new(170, 190, 210)).bold();
const DANGER: CellStyle = CellStyle::fg(Rgb::new(230, 80, 60)).bold();
const FLAME: CellStyle = CellStyle::fg(Rgb::new(255, 190, 40)).bold();
const POTION: CellStyle = CellStyle::fg(Rgb::new(120, 160, 255)).bold();
const SKY: CellStyle = CellStyle::fg(Rgb::new(90, 110, 200));
pub const CHARACTER_STYLE: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
const CURSOR: CellStyle = CellStyle::fg(Rgb::new(80, 255, 120)).bold();

const fn glyph(rows: [&'static str; 3], style: CellStyle) -> Option<Glyph> {
    Some(Glyph { rows, style })
}

/// Glyph of a block or sprite image, or `None` when it has no visible cells.
pub fn glyph_for(image: ImageId) -> Option<Glyph> {
    match image.table {
        ImageTable::Background => background(image),
        ImageTable::Movable => movable(image),
        ImageTable::Foreground => foreground(image),
        ImageTable::FloorMask => glyph(["    ", "    ", "▔▔▔▔"], FLOOR),
        ImageTable::HalfFloorMask => glyph(["    ", "    ", "▔▔  "], FLOOR),
        ImageTable::Object => object(image),
        ImageTable::Section => match image.index {
            0 | 1 => glyph(["", "", "▬"], FLOOR),
            _ => glyph(["", "", "▬▬"], FLOOR),
        },
        ImageTable::Character(_) => None,
        ImageTable::Message => glyph(["▗  ▖", "    ", "▝  ▘"], CURSOR),
    }
}

/// Character sprites are two cells: a head above a body letter.
pub fn character_cells(letter: char, face: Facing) -> [(i32, i32, char); 3] {
    let arrow = match face {
        Facing::Left => '<',
        Facing::Right => '>',
    };
    [(0, -1, 'o'), (0, 0, letter), (1, -1, arrow)]
}

fn object_id(image: ImageId) -> Option<ObjectId> {
    ObjectId::from_bits(image.index)
}

fn background(image: ImageId) -> Option<Glyph> {
    use ObjectId::*;
    let id = object_id(image)?;
    match id {
        // Wall patterns on empty space.
        Space => match image.variant % 3 {
            0 => None,
            1 => glyph(["·  ·", "    ", "·  ·"], WALL),
            _ => glyph([" ▫  ", "   ▫", " ▫  "], WALL),
        },
        Floor | Torch | Gate | Spikes | LooseFloor | PressPlate | UpPressPlate | StuckPlate
        | Slicer | Flask | Sword | Mirror | Exit | Exit2 | ArchBottom => {
            glyph(["    ", "    ", "▁▁▁▁"], FLOOR)
        }
        Bones => glyph(["    ", "    ", "▁☠▁▁"], FLOOR),
        Rubble => glyph(["    ", "    ", "▁∴▁∴"], FLOOR),
        Pillar | PillarBottom => glyph([" ▐▌ ", " ▐▌ ", "▁▐▌▁"], STONE),
        PillarTop => glyph([" ▐▌ ", " ▐▌ ", " ▐▌ "], STONE),
        PanelWithFloor => glyph(["▓▓▓▓", "▓▓▓▓", "▓▓▓▓"], WALL),
        PanelNoFloor => glyph(["▓▓▓▓", "▓▓▓▓", "    "], WALL),
        Block => glyph(["████", "████", "████"], STONE),
        Window | Window2 => glyph(["    ", " ░░ ", "    "], SKY),
        ArchTop1 | ArchTop2 | ArchTop3 | ArchTop4 => glyph(["▀▀▀▀", "▘  ▝", "    "], STONE),
    }
}

fn movable(image: ImageId) -> Option<Glyph> {
    use ObjectId::*;
    let id = object_id(image)?;
    let v = image.variant;
    match id {
        // Bars hang from the top and rise as the gate opens.
        Gate => match v {
            0..=2 => glyph(["   ┃", "   ┃", "   ┃"], METAL),
            3..=5 => glyph(["   ┃", "   ┃", "    "], METAL),
            6..=7 => glyph(["   ┃", "    ", "    "], METAL),
            _ => glyph(["   ╹", "    ", "    "], METAL),
        },
        Spikes => match v {
            0 => None,
            1..=2 => glyph(["    ", "    ", " ˄˄ "], DANGER),
            _ => glyph(["    ", "    ", "▲▲▲▲"], DANGER),
        },
        LooseFloor => match v & 1 {
            0 => glyph(["    ", "    ", "▁▂▁▂"], FLOOR),
            _ => glyph(["    ", "    ", "▂▁▂▁"], FLOOR),
        },
        PressPlate | UpPressPlate => match v {
            0 => glyph(["    ", "    ", " ▄▄ "], METAL),
            _ => glyph(["    ", "    ", " ▁▁ "], METAL),
        },
        Slicer => match v {
            0 => glyph([" ▕▏ ", "    ", "    "], METAL),
            _ => glyph([" ▕▏ ", " ▕▏ ", "    "], DANGER),
        },
        Exit | Exit2 => match v {
            0 => glyph(["▛▀▀▜", "▌▓▓▐", "▌▓▓▐"], STONE),
            _ => glyph(["▛▀▀▜", "▌  ▐", "▌  ▐"], STONE),
        },
        _ => None,
    }
}

fn foreground(image: ImageId) -> Option<Glyph> {
    use ObjectId::*;
    let id = object_id(image)?;
    match id {
        Pillar | PillarBottom | PillarTop => glyph(["  ▌ ", "  ▌ ", "  ▌ "], STONE),
        Gate => glyph(["   ╿", "    ", "    "], METAL),
        Block => glyph(["████", "████", "████"], STONE),
        PanelWithFloor | PanelNoFloor => glyph(["▓   ", "▓   ", "▓   "], WALL),
        ArchTop1 | ArchTop2 | ArchTop3 | ArchTop4 | ArchBottom => glyph(["▀   ", "    ", "    "], STONE),
        Mirror => glyph([" ▐  ", " ▐  ", "    "], SKY),
        _ => None,
    }
}

fn object(image: ImageId) -> Option<Glyph> {
    use ObjectId::*;
    match object_id(image)? {
        Torch => glyph(["  ♦ ", "    ", "    "], FLAME),
        Flask => glyph(["    ", "  ° ", "  ▴ "], POTION),
        Sword => glyph(["    ", "    ", " ─╼ "], METAL),
        _ => None,
    }
}
