use bimap::BiMap;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GeneratedName(usize);

impl From<GeneratedName> for String {
    fn from(name: GeneratedName) -> Self {
        format!("%t{}", name.0)
    }
}

/// An interned identifier. Variables, function names, physical registers and
/// the discard marker are all names; what a name stands for is recorded in the
/// [`Names`] table that produced it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Name(usize);

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Actual {
    Lit(String),
    Generated(GeneratedName),
    Register(usize),
    Discard,
}

/// The name table of one compilation session. Every name is created through
/// this table, including fresh temporaries, so name generation carries no
/// process-wide state.
#[derive(Debug)]
pub struct Names {
    names: BiMap<Name, Actual>,
    curr_gen: usize,
    discard: Name,
}

impl Names {
    pub fn new() -> Self {
        let discard = Name(0);
        let mut names = BiMap::new();
        names.insert(discard, Actual::Discard);

        Self {
            names,
            curr_gen: 0,
            discard,
        }
    }

    pub fn add(&mut self, actual: Actual) -> Name {
        if let Some(id) = self.names.get_by_right(&actual) {
            *id
        } else {
            let id = Name(self.names.len());
            self.names.insert(id, actual);
            id
        }
    }

    pub fn lit(&mut self, text: impl Into<String>) -> Name {
        self.add(Actual::Lit(text.into()))
    }

    /// Generate a unique name.
    pub fn fresh(&mut self) -> Name {
        let id = GeneratedName(self.curr_gen);
        self.curr_gen += 1;

        self.add(Actual::Generated(id))
    }

    /// Get the name of physical register `index`.
    pub fn register(&mut self, index: usize) -> Name {
        self.add(Actual::Register(index))
    }

    /// The marker bound in place of names that are never read.
    pub fn discard(&self) -> Name {
        self.discard
    }

    pub fn is_discard(&self, name: &Name) -> bool {
        *name == self.discard
    }

    pub fn get(&self, name: &Name) -> &Actual {
        // Only one `Names` should be able to produce names, so this should never fail.
        self.names
            .get_by_left(name)
            .expect("name from a different name table")
    }

    pub fn register_index(&self, name: &Name) -> Option<usize> {
        match self.names.get_by_left(name) {
            Some(Actual::Register(index)) => Some(*index),
            _ => None,
        }
    }

    pub fn lookup(&self, text: &str) -> Option<Name> {
        self.names
            .get_by_right(&Actual::Lit(text.to_string()))
            .copied()
    }

    pub fn text(&self, name: &Name) -> String {
        match self.get(name) {
            Actual::Lit(text) => text.clone(),
            Actual::Generated(gen) => String::from(*gen),
            Actual::Register(index) => format!("%r{index}"),
            Actual::Discard => String::from("_"),
        }
    }
}

impl Default for Names {
    fn default() -> Self {
        Self::new()
    }
}
