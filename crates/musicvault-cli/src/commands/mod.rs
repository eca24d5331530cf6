pub mod bandish;
pub mod config;
pub mod diary;
pub mod karyakram;
pub mod perform;
pub mod raga;
pub mod search;
pub mod session;
pub mod setlist;
pub mod status;
