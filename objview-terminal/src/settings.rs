/// Viewer tuning knobs
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    /// Translation/rotation/scale increment per key press
    pub step: f64,
    /// Camera movement per key press
    pub camera_step: f64,
    /// Lower bound for every scale component
    pub min_scale: f64,
    pub frame_rate: u64,
    /// Height of a terminal cell relative to its width
    pub cell_aspect: f64,
    /// Delete orphaned attributes when polygons are deleted
    pub prune_on_polygon_delete: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            step: 0.5,
            camera_step: 2.5,
            min_scale: 0.1,
            frame_rate: 30,
            cell_aspect: 2.0,
            prune_on_polygon_delete: true,
        }
    }
}

impl ViewerSettings {
    /// Camera aspect ratio for a grid of `width` x `height` cells
    pub fn aspect_ratio(&self, width: usize, height: usize) -> f64 {
        if height == 0 {
            return 1.0;
        }
        width as f64 / (height as f64 * self.cell_aspect)
    }
}
