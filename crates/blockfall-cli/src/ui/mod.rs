pub mod widgets;

/// Terminal footprint of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub cell_width: u16,
    pub cell_height: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_width: 2,
            cell_height: 1,
        }
    }
}
