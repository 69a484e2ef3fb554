//! Simulated screen layout
//!
//! Both grids are laid out at fixed positions. Stash coordinates do not
//! encode the tab: a click lands on whatever page is showing.

use crate::items::{Cell, Item, Zone, INVENTORY_HEIGHT, INVENTORY_WIDTH};
use crate::session::ScreenPoint;

pub const CELL_PX: i32 = 40;

pub const STASH_ORIGIN: ScreenPoint = ScreenPoint { x: 100, y: 100 };
pub const STASH_WIDTH: usize = 10;
pub const STASH_HEIGHT: usize = 10;

pub const INVENTORY_ORIGIN: ScreenPoint = ScreenPoint { x: 1000, y: 600 };

/// Grid area a point falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Inventory,
    Stash,
}

impl Area {
    pub fn of_zone(zone: Zone) -> Option<Self> {
        match zone {
            Zone::Inventory => Some(Area::Inventory),
            Zone::Stash | Zone::SharedStash => Some(Area::Stash),
            _ => None,
        }
    }

    fn origin(&self) -> ScreenPoint {
        match self {
            Area::Inventory => INVENTORY_ORIGIN,
            Area::Stash => STASH_ORIGIN,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        match self {
            Area::Inventory => (INVENTORY_WIDTH, INVENTORY_HEIGHT),
            Area::Stash => (STASH_WIDTH, STASH_HEIGHT),
        }
    }
}

/// Center of a single cell
pub fn cell_center(area: Area, cell: Cell) -> ScreenPoint {
    let origin = area.origin();
    ScreenPoint::new(
        origin.x + i32::from(cell.x) * CELL_PX + CELL_PX / 2,
        origin.y + i32::from(cell.y) * CELL_PX + CELL_PX / 2,
    )
}

/// Center of an item's footprint; items outside both grids map to the origin
pub fn item_center(item: &Item) -> ScreenPoint {
    let Some(area) = Area::of_zone(item.location.zone) else {
        return ScreenPoint::default();
    };
    let origin = area.origin();
    let cell = item.location.cell;
    ScreenPoint::new(
        origin.x + i32::from(cell.x) * CELL_PX + i32::from(item.size.0) * CELL_PX / 2,
        origin.y + i32::from(cell.y) * CELL_PX + i32::from(item.size.1) * CELL_PX / 2,
    )
}

/// Grid cell under a point
pub fn decode(point: ScreenPoint) -> Option<(Area, Cell)> {
    [Area::Inventory, Area::Stash].into_iter().find_map(|area| {
        let origin = area.origin();
        let (w, h) = area.size();
        let dx = point.x - origin.x;
        let dy = point.y - origin.y;
        if dx < 0 || dy < 0 {
            return None;
        }
        let (cx, cy) = ((dx / CELL_PX) as usize, (dy / CELL_PX) as usize);
        (cx < w && cy < h).then(|| (area, Cell::new(cx as u8, cy as u8)))
    })
}
