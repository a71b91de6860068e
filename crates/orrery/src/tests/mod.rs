//! In-tree integration tests across the view, scene and camera modules
