mod health;
mod interfaces;
mod menu;
mod power;
mod state;

pub use state::App;
