use std::fmt::Display;

/// A virtual register. Two temporaries are the same temporary iff their names match,
/// so machine registers are just temporaries with well-known names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(String);

impl Temp {
    pub fn named(name: &str) -> Self {
        Temp(name.to_string())
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn named(name: &str) -> Self {
        Label(name.to_string())
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out `t0`, `t1`, ... for one procedure body.
#[derive(Debug, Default)]
pub struct Temps {
    next: u32,
}

impl Temps {
    pub fn new() -> Self {
        Temps { next: 0 }
    }
    pub fn fresh(&mut self) -> Temp {
        let temp = Temp(format!("t{}", self.next));
        self.next += 1;
        temp
    }
}

/// Hands out `L0`, `L1`, ...
#[derive(Debug, Default)]
pub struct Labels {
    next: u32,
}

impl Labels {
    pub fn new() -> Self {
        Labels { next: 0 }
    }
    pub fn fresh(&mut self) -> Label {
        let label = Label(format!("L{}", self.next));
        self.next += 1;
        label
    }
}
