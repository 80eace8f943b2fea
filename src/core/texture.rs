use std::collections::HashSet;

use indexmap::IndexMap;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Texture {
    name: String,
    bytes: Vec<u8>,
}

impl Texture {
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }

    pub fn get_name(&self) -> &str { &self.name }
    pub fn get_bytes(&self) -> &[u8] { &self.bytes }
}


/// Insertion-ordered texture store shared by every document of one import run.
///
/// Textures are looked up by their declared name (a file stem such as `skin`),
/// and the position of an entry is its global texture index. The running
/// `offset` is the number of textures already committed; documents append
/// behind it.
#[derive(Debug, Default)]
pub struct TextureTable {
    /// lookup name -> texture as it will be persisted
    textures: IndexMap<String, Texture>,
    /// persisted names already handed out
    stored_names: HashSet<String>,
    offset: usize,
    generation: usize,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a bundle-level texture under its own name and advances the offset.
    /// A second texture with an already-known name is ignored and the existing
    /// index is returned.
    pub fn insert_shared(&mut self, name: String, bytes: Vec<u8>) -> usize {
        if let Some(idx) = self.textures.get_index_of(&name) {
            log::warn!("Texture '{}' is declared twice, keeping the first one", name);
            return idx;
        }
        self.stored_names.insert(name.clone());
        let (idx, _) = self.textures.insert_full(name.clone(), Texture::new(name, bytes));
        self.offset += 1;
        idx
    }

    /// Reconciles one document's local texture list against the table.
    ///
    /// Returns the local-to-global index map. Names already present reuse the
    /// existing entry; unknown names are appended under a name synthesized from
    /// `file_stem` and the table-wide generation counter, and `fetch` is asked
    /// for the image bytes of that local index. The offset is advanced by the
    /// number of appended textures once every local texture is processed.
    pub fn reconcile<'n, I, F, E>(&mut self, file_stem: &str, names: I, mut fetch: F) -> Result<Vec<usize>, E>
        where
            I: IntoIterator<Item = &'n str>,
            F: FnMut(usize) -> Result<Vec<u8>, E>,
    {
        let base = self.offset;
        let mut added = 0;
        let mut mapping = Vec::new();
        for (local_idx, name) in names.into_iter().enumerate() {
            if let Some(global_idx) = self.textures.get_index_of(name) {
                mapping.push(global_idx);
                continue;
            }
            let bytes = fetch(local_idx)?;
            let stored_name = self.next_stored_name(file_stem);
            self.textures.insert(name.to_string(), Texture::new(stored_name, bytes));
            mapping.push(base + added);
            added += 1;
        }
        self.offset += added;
        debug_assert_eq!(self.offset, self.textures.len());
        Ok(mapping)
    }

    fn next_stored_name(&mut self, file_stem: &str) -> String {
        loop {
            let candidate = format!("{}_{}", file_stem, self.generation);
            self.generation += 1;
            if self.stored_names.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn get_index_of(&self, name: &str) -> Option<usize> {
        self.textures.get_index_of(name)
    }

    pub fn get(&self, index: usize) -> Option<&Texture> {
        self.textures.get_index(index).map(|(_, t)| t)
    }

    /// Number of textures committed so far, i.e. the next global index.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Consumes the table, yielding the textures in global index order.
    pub fn into_textures(self) -> Vec<Texture> {
        self.textures.into_values().collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn no_fetch(_: usize) -> Result<Vec<u8>, ()> {
        panic!("texture should have been deduplicated")
    }

    #[test]
    fn shared_textures_seed_the_offset() {
        let mut table = TextureTable::new();
        assert_eq!(table.insert_shared("skin".to_string(), vec![1]), 0);
        assert_eq!(table.insert_shared("eyes".to_string(), vec![2]), 1);
        assert_eq!(table.insert_shared("skin".to_string(), vec![3]), 0);
        assert_eq!(table.offset(), 2);
        assert_eq!(table.get(0).unwrap().get_bytes(), &[1]);
    }

    #[test]
    fn reconcile_dedups_by_name() {
        let mut table = TextureTable::new();
        table.insert_shared("skin".to_string(), vec![1]);
        let map = table.reconcile("body", ["skin"], no_fetch).unwrap();
        assert_eq!(map, vec![0]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn reconcile_appends_behind_the_offset() {
        let mut table = TextureTable::new();
        table.insert_shared("skin".to_string(), vec![0]);

        let a = table.reconcile("a", ["x", "skin", "y"], |i| Ok::<_, ()>(vec![i as u8])).unwrap();
        assert_eq!(a, vec![1, 0, 2]);
        assert_eq!(table.offset(), 3);

        let b = table.reconcile("b", ["y", "z"], |i| Ok::<_, ()>(vec![i as u8])).unwrap();
        assert_eq!(b, vec![2, 3]);
        assert_eq!(table.offset(), 4);

        let names = table.into_textures().into_iter()
            .map(|t| t.get_name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["skin", "a_0", "a_1", "b_2"]);
    }

    #[test]
    fn stored_names_never_collide() {
        let mut table = TextureTable::new();
        table.insert_shared("m_0".to_string(), vec![]);
        table.reconcile("m", ["fresh"], |_| Ok::<_, ()>(vec![])).unwrap();
        assert_eq!(table.get(1).unwrap().get_name(), "m_1");
    }

    #[test]
    fn fetch_errors_propagate() {
        let mut table = TextureTable::new();
        let res = table.reconcile("a", ["x"], |_| Err("missing"));
        assert_eq!(res, Err("missing"));
    }
}
