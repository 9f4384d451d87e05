#[derive(Debug, Clone)]
pub enum AppEvent {
    Select(usize),
    Deselect(usize),
    Reload,
    ConfigReload,
}
