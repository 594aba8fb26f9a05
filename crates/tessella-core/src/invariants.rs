//! Cross-map invariant validation for the metadata store.
//!
//! Run after every engine operation in debug builds.

use crate::registry::{Registry, SessionId, SurfaceId};

/// Error indicating which invariant was violated.
#[derive(Debug, thiserror::Error)]
pub enum InvariantError {
    #[error("{surface} refers to unknown {session}")]
    OrphanSurface {
        surface: SurfaceId,
        session: SessionId,
    },

    #[error("{session} lists unknown {surface}")]
    StaleSurfaceList {
        session: SessionId,
        surface: SurfaceId,
    },

    #[error("{session} lists {surface}, which is owned by {owner}")]
    WrongOwner {
        session: SessionId,
        surface: SurfaceId,
        owner: SessionId,
    },

    #[error("{surface} links unknown child {child}")]
    MissingChild {
        surface: SurfaceId,
        child: SurfaceId,
    },

    #[error("{surface} links unknown parent {parent}")]
    MissingParent {
        surface: SurfaceId,
        parent: SurfaceId,
    },
}

/// Validate all metadata-store invariants. Returns the first
/// violation found.
pub fn validate(registry: &Registry) -> Result<(), InvariantError> {
    // 1. Every surface's owning session must still be in the session
    //    map, and every parent/child link must resolve.
    for (surface, info) in registry.iter_surfaces() {
        if !registry.contains_session(info.session) {
            return Err(InvariantError::OrphanSurface {
                surface,
                session: info.session,
            });
        }
        if let Some(parent) = info.parent {
            if !registry.contains_surface(parent) {
                return Err(InvariantError::MissingParent { surface, parent });
            }
        }
        for &child in &info.children {
            if !registry.contains_surface(child) {
                return Err(InvariantError::MissingChild { surface, child });
            }
        }
    }

    // 2. Session surface lists must name existing surfaces owned by
    //    that session.
    for (session, info) in registry.iter_sessions() {
        for &surface in &info.surfaces {
            match registry.get_surface_info(surface) {
                None => {
                    return Err(InvariantError::StaleSurfaceList { session, surface });
                }
                Some(surface_info) if surface_info.session != session => {
                    return Err(InvariantError::WrongOwner {
                        session,
                        surface,
                        owner: surface_info.session,
                    });
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}
