use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static NT_WITH_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<chain>[^.\s]+)\.(?P<resn>[ACGU])(?P<resi>-?\d+)")
        .expect("Failed to compile NT_WITH_CHAIN")
});

static NT_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<resn>[ACGU])(?P<resi>-?\d+)").expect("Failed to compile NT_BARE")
});

/// Canonical RNA base codes recognized in nucleotide identifiers
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Base {
    /// Adenine
    A,
    /// Cytosine
    C,
    /// Guanine
    G,
    /// Uracil
    U,
}

impl FromStr for Base {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Base::A),
            "C" => Ok(Base::C),
            "G" => Ok(Base::G),
            "U" => Ok(Base::U),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Base::A => "A",
            Base::C => "C",
            Base::G => "G",
            Base::U => "U",
        };
        write!(f, "{code}")
    }
}

/// The struct for a nucleotide identifier such as `A.C19`
#[derive(Debug, Hash, PartialEq, Eq, Clone, Default)]
pub struct NucleotideId {
    /// Chain label, absent for bare identifiers like `C19`
    pub chain: Option<String>,
    /// Base code
    pub base: Option<Base>,
    /// Residue index
    pub resi: Option<i64>,
}

impl NucleotideId {
    /// A fully recovered identifier.
    pub fn new(chain: Option<&str>, base: Base, resi: i64) -> Self {
        Self {
            chain: chain.map(str::to_string),
            base: Some(base),
            resi: Some(resi),
        }
    }

    /// `true` when no part of the identifier could be recovered.
    pub fn is_missing(&self) -> bool {
        self.chain.is_none() && self.base.is_none() && self.resi.is_none()
    }
}

impl fmt::Display for NucleotideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(chain) = &self.chain {
            write!(f, "{chain}.")?;
        }
        match (self.base, self.resi) {
            (Some(base), Some(resi)) => write!(f, "{base}{resi}"),
            _ => write!(f, "?"),
        }
    }
}

/// Split a nucleotide token into chain, base and residue index.
///
/// The token is searched rather than matched whole, so a prefix such as the
/// `G ` in `G A.G1` is skipped. `A.C19` gives chain `A`; `C19` gives no chain;
/// anything else gives an all-missing identifier.
pub fn parse_nt(token: &str) -> NucleotideId {
    if let Some(caps) = NT_WITH_CHAIN.captures(token) {
        if let Some(id) = from_captures(Some(&caps["chain"]), &caps["resn"], &caps["resi"]) {
            return id;
        }
    }
    if let Some(caps) = NT_BARE.captures(token) {
        if let Some(id) = from_captures(None, &caps["resn"], &caps["resi"]) {
            return id;
        }
    }
    NucleotideId::default()
}

fn from_captures(chain: Option<&str>, resn: &str, resi: &str) -> Option<NucleotideId> {
    let base = resn.parse::<Base>().ok()?;
    let resi = resi.parse::<i64>().ok()?;
    Some(NucleotideId::new(chain, base, resi))
}
