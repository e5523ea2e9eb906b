pub mod refresher;

pub use refresher::RefreshTask;

pub fn module_ready() -> bool {
    true
}
