use serde::Serialize;

use super::arena::SimObjectId;
use super::building::BuildingType;

/// Label/value pair shown in the info panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentRow {
    pub label: String,
    pub value: String,
}

/// Presentation-neutral description of a simulation object. The frontend
/// decides how to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFragment {
    pub title: String,
    pub rows: Vec<FragmentRow>,
}

impl DisplayFragment {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.rows.push(FragmentRow {
            label: label.into(),
            value: value.to_string(),
        });
        self
    }

    /// Plain-text rendering for native overlays and logs.
    pub fn to_text(&self) -> String {
        let mut text = self.title.clone();
        for row in &self.rows {
            text.push('\n');
            text.push_str(&row.label);
            text.push_str(": ");
            text.push_str(&row.value);
        }
        text
    }
}

/// Capability shared by everything the picker can return.
pub trait SimObject: Send + Sync {
    /// Grid cell the object occupies, as (x, y).
    fn grid_position(&self) -> (i32, i32);

    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);

    fn to_display_fragment(&self) -> DisplayFragment;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Highlight {
    focused: bool,
    selected: bool,
}

/// Ground cell of the city grid.
#[derive(Debug, Clone)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub building: Option<SimObjectId>,
    pub decoration: Option<SimObjectId>,
    highlight: Highlight,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            building: None,
            decoration: None,
            highlight: Highlight::default(),
        }
    }
}

/// Building standing on a tile.
#[derive(Debug, Clone)]
pub struct Building {
    pub kind: BuildingType,
    pub x: i32,
    pub y: i32,
    pub residents: u32,
    highlight: Highlight,
}

impl Building {
    pub fn new(kind: BuildingType, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            residents: 0,
            highlight: Highlight::default(),
        }
    }
}

/// Purely visual scenery such as trees. Bulldozing clears it.
#[derive(Debug, Clone)]
pub struct Decoration {
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
    highlight: Highlight,
}

impl Decoration {
    pub fn new(name: &'static str, x: i32, y: i32) -> Self {
        Self {
            name,
            x,
            y,
            highlight: Highlight::default(),
        }
    }
}

macro_rules! impl_highlight {
    () => {
        fn grid_position(&self) -> (i32, i32) {
            (self.x, self.y)
        }

        fn is_focused(&self) -> bool {
            self.highlight.focused
        }

        fn set_focused(&mut self, focused: bool) {
            self.highlight.focused = focused;
        }

        fn is_selected(&self) -> bool {
            self.highlight.selected
        }

        fn set_selected(&mut self, selected: bool) {
            self.highlight.selected = selected;
        }
    };
}

impl SimObject for Tile {
    impl_highlight!();

    fn to_display_fragment(&self) -> DisplayFragment {
        DisplayFragment::new("Tile")
            .with_row("Coordinates", format!("({}, {})", self.x, self.y))
            .with_row("Occupied", if self.building.is_some() { "yes" } else { "no" })
    }
}

impl SimObject for Building {
    impl_highlight!();

    fn to_display_fragment(&self) -> DisplayFragment {
        let fragment = DisplayFragment::new(self.kind.display_name())
            .with_row("Coordinates", format!("({}, {})", self.x, self.y));
        if self.kind.is_zone() {
            fragment.with_row("Residents", self.residents)
        } else {
            fragment
        }
    }
}

impl SimObject for Decoration {
    impl_highlight!();

    fn to_display_fragment(&self) -> DisplayFragment {
        DisplayFragment::new(self.name).with_row("Coordinates", format!("({}, {})", self.x, self.y))
    }
}

/// Arena payload. Typed access for city logic, trait access for everyone else.
#[derive(Debug, Clone)]
pub enum SimEntity {
    Tile(Tile),
    Building(Building),
    Decoration(Decoration),
}

impl SimEntity {
    pub fn as_object(&self) -> &dyn SimObject {
        match self {
            Self::Tile(tile) => tile,
            Self::Building(building) => building,
            Self::Decoration(decoration) => decoration,
        }
    }

    pub fn as_object_mut(&mut self) -> &mut dyn SimObject {
        match self {
            Self::Tile(tile) => tile,
            Self::Building(building) => building,
            Self::Decoration(decoration) => decoration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_fragment_lists_residents() {
        let mut house = Building::new(BuildingType::Residential, 3, 4);
        house.residents = 2;
        let fragment = house.to_display_fragment();
        assert_eq!(fragment.title, "Residential Zone");
        assert_eq!(fragment.to_text(), "Residential Zone\nCoordinates: (3, 4)\nResidents: 2");
    }

    #[test]
    fn highlight_flags_are_independent() {
        let mut tile = Tile::new(0, 0);
        tile.set_focused(true);
        tile.set_selected(true);
        tile.set_focused(false);
        assert!(!tile.is_focused());
        assert!(tile.is_selected());
    }
}
