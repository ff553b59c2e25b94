//! Fire-and-forget log sink used by the allocation rule.

pub trait LogPort {
    fn log(&self, message: &str);
}
