//! Player domain — first-person локомоция
//!
//! Содержит:
//! - PlayerController (скорости, гравитация, прыжок с задержкой)
//! - PlayerInput (планарные оси + edge-состояния прыжка)
//! - JumpState (очередь прыжка)

pub mod controller;

pub use controller::*;
