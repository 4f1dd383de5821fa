pub mod builder;

pub use builder::{
    build_delete, build_insert, build_select, build_update, build_update_with_derived, build_where,
    Statement,
};
