pub mod configuration;
pub mod controller;
pub mod events;
pub mod geolocation;
pub mod map_view;
pub mod state;
pub mod terminal;
pub mod update;
