/// Scene hand-off requests. Loading the scene is the game's job.
pub trait SceneRequester {
    fn request_scene(&mut self, scene: &str);
}

/// Collects requested scenes until the game drains them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneQueue {
    pending: Vec<String>,
}

impl SceneQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending request, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn last(&self) -> Option<&str> {
        self.pending.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl SceneRequester for SceneQueue {
    fn request_scene(&mut self, scene: &str) {
        log::info!("scene requested: {}", scene);
        self.pending.push(scene.to_string());
    }
}
