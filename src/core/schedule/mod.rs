//=========================================================================
// Frame Scheduling
//=========================================================================
//
// Frame-granular deferred continuations.
//
// Architecture:
//   schedule(Resume, payload) → Deferred (one slot)
//                                  ↓
//   poll(frame, predicate) once per tick → Some(payload) when due
//
// A slot never holds more than one continuation. Scheduling over an
// outstanding one hands the old payload back so the owner can wind it
// down before it is forgotten.
//
//=========================================================================

//=== Module Declarations =================================================

mod deferred;

//=== Public API ==========================================================

pub use deferred::{Deferred, Resume};
