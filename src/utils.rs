mod increment_u32_id;
mod now;

pub use increment_u32_id::increment_u32_id;
pub use now::now;
