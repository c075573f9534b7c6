//! Resume snapshots: frozen copies of profile education and work, plus
//! markdown export of either a snapshot or an unsaved document form.

pub mod handlers;
pub mod procedures;
pub mod render;
