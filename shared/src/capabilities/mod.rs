mod location;
mod navigate;
mod picker;

pub use self::location::{
    Location, LocationError, LocationOperation, LocationOutput, LocationResult, PermissionStatus,
};
pub use self::navigate::{Navigate, NavigateOperation, Route};
pub use self::picker::{Picker, PickerMode, PickerOperation, PickerOutput};

// Crux's built-in Render is used as-is for view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub location: Location<Event>,
    pub navigate: Navigate<Event>,
    pub picker: Picker<Event>,
}
