use rand::Rng;

/// Handle to one entry of an image pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    Inactive(usize),
    Active(usize),
}

/// The two fixed pools cells draw their pictures from.
#[derive(Clone, Debug)]
pub struct ImagePools {
    inactive: Vec<String>,
    active: Vec<String>,
}

impl Default for ImagePools {
    fn default() -> Self {
        Self {
            inactive: vec!["unlit1.jpg".into(), "unlit2.jpg".into()],
            active: vec![
                "lit1.jpg".into(),
                "lit2.jpg".into(),
                "lit3.jpg".into(),
                "lit4.jpg".into(),
            ],
        }
    }
}

impl ImagePools {
    pub fn new(inactive: Vec<String>, active: Vec<String>) -> anyhow::Result<Self> {
        if inactive.is_empty() || active.is_empty() {
            anyhow::bail!(
                "image pools must not be empty (inactive: {}, active: {})",
                inactive.len(),
                active.len()
            );
        }
        Ok(Self { inactive, active })
    }

    pub fn draw_inactive<R: Rng>(&self, rng: &mut R) -> ImageId {
        ImageId::Inactive(rng.random_range(0..self.inactive.len()))
    }

    pub fn draw_active<R: Rng>(&self, rng: &mut R) -> ImageId {
        ImageId::Active(rng.random_range(0..self.active.len()))
    }

    /// File name behind an id, `None` if the id points outside its pool.
    pub fn name(&self, id: ImageId) -> Option<&str> {
        match id {
            ImageId::Inactive(i) => self.inactive.get(i),
            ImageId::Active(i) => self.active.get(i),
        }
        .map(String::as_str)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.name(id).is_some()
    }

    /// Every id of both pools, inactive first.
    pub fn ids(&self) -> impl Iterator<Item = ImageId> + '_ {
        (0..self.inactive.len())
            .map(ImageId::Inactive)
            .chain((0..self.active.len()).map(ImageId::Active))
    }
}
