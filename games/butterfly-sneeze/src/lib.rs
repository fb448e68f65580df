use wasm_bindgen::prelude::*;

pub mod assets;
pub mod config;
pub mod controller;
pub mod frame;
pub mod game;
pub mod generation;
pub mod pointer;
pub mod router;
pub mod script;

pub use game::ButterflySneeze;

bloom_web::export_game!(ButterflySneeze, "butterfly-sneeze");
