//! The header logo cube
//!
//! Twelve small cubes arranged into a letter. The whole group rotates while
//! hovered, and once more right after mount until the rotate-once timer
//! clears the flag.

use std::cell::Cell;
use std::rc::Rc;

use folio_core::{ScheduledTimer, TimerHandle};

use crate::markup::{div, Element};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    fn class(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }
}

use Face::*;

/// Visible faces of each small cube, by location
const CUBES: [&[Face]; 12] = [
    &[Back, Left, Right, Top, Bottom],
    &[Left, Right, Top, Bottom],
    &[Left, Right, Top, Bottom],
    &[Left, Right, Top, Bottom],
    &[Front, Left, Right, Bottom],
    &[Front, Back, Left, Right],
    &[Front, Back, Left, Right],
    &[Front, Back, Left, Right],
    &[Front, Back, Left, Top],
    &[Front, Back, Top, Bottom],
    &[Front, Back, Top, Bottom],
    &[Front, Back, Right, Top, Bottom],
];

/// Location of the cube whose overflow is clipped
const CLIPPED_LOCATION: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CubeState {
    pub rotating: bool,
    pub rotate_once: bool,
}

struct CubeShared {
    rotating: Cell<bool>,
    rotate_once: Cell<bool>,
}

/// The mounted cube component
pub struct Cube {
    shared: Rc<CubeShared>,
    rotate_once_timer: ScheduledTimer,
}

impl Cube {
    /// Mount with the rotate-once flag set for `rotate_once_ms`
    pub fn mount(timers: &TimerHandle, rotate_once_ms: u64) -> Self {
        let shared = Rc::new(CubeShared {
            rotating: Cell::new(false),
            rotate_once: Cell::new(true),
        });

        let weak = Rc::downgrade(&shared);
        let rotate_once_timer = timers.schedule_scoped(rotate_once_ms, "cube-rotate-once", move || {
            if let Some(shared) = weak.upgrade() {
                shared.rotate_once.set(false);
                tracing::debug!("cube rotate-once finished");
            }
        });

        Self {
            shared,
            rotate_once_timer,
        }
    }

    /// Pointer entered (`true`) or left (`false`) the cube
    pub fn hover(&self, hovered: bool) {
        self.shared.rotating.set(hovered);
    }

    pub fn state(&self) -> CubeState {
        CubeState {
            rotating: self.shared.rotating.get(),
            rotate_once: self.shared.rotate_once.get(),
        }
    }

    /// Cancel the rotate-once timer if it has not fired yet
    pub fn unmount(&mut self) -> bool {
        self.rotate_once_timer.cancel()
    }

    pub fn render(&self) -> Element {
        render_cube(self.state())
    }
}

/// Cube markup for a given state
pub fn render_cube(state: CubeState) -> Element {
    let cubes = CUBES.iter().enumerate().map(|(index, faces)| {
        let location = index + 1;
        div()
            .class("cube")
            .class(format!("loc-{}", location))
            .class_if(location == CLIPPED_LOCATION, "clipped")
            .children(
                faces
                    .iter()
                    .map(|face| div().class("face").class(face.class())),
            )
    });

    div().child(
        div()
            .class("cube-container")
            .class_if(state.rotating, "cube-container-rotating")
            .class_if(state.rotate_once, "cube-container-rotate-once")
            .children(cubes),
    )
}
