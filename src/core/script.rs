/// One script source file of the bundle. Its content is opaque to the importer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Script {
    name: String,
    source: String,
}

impl Script {
    pub fn new(name: String, source: String) -> Self {
        Self { name, source }
    }

    pub fn get_name(&self) -> &str { &self.name }
    pub fn get_source(&self) -> &str { &self.source }
}
