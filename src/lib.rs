//! Crate root module declarations for the racing-chess engine.
//!
//! Racing chess drops turn order: every piece may move whenever its own
//! cooldown has run out, and a background clock ticks cooldowns down. This
//! file exposes the board model, the rule engine, the clock, the match state
//! machine, the AI opponent and the text helpers under stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod match_settings;
    pub mod piece_store;
}

pub mod move_generation {
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod move_validator;
}

pub mod timing {
    pub mod ticker;
}

pub mod match_control {
    pub mod match_controller;
    pub mod match_session;
}

pub mod engines {
    pub mod evaluator;
    pub mod move_scoring;
}

pub mod utils {
    pub mod algebraic;
    pub mod layout_generator;
    pub mod layout_parser;
    pub mod render_board;
}
