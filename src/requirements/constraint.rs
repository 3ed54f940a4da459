//! Semantic-version range satisfaction.
//!
//! `package.json` engines use npm's range syntax, which is not Cargo's, so
//! the grammar is parsed here and concrete versions are compared with
//! [`semver::Version`] ordering.
//!
//! Supported forms:
//!
//! | Range            | Meaning                         |
//! |------------------|---------------------------------|
//! | `1.2.3`, `=1.2.3`| exactly 1.2.3                   |
//! | `>=1.2.3 <2`     | every comparator must hold      |
//! | `^1.2.3`         | `>=1.2.3 <2.0.0-0`              |
//! | `~1.2.3`         | `>=1.2.3 <1.3.0-0`              |
//! | `1.x`, `1`, `*`  | x-ranges                        |
//! | `1.2.3 - 2.3`    | `>=1.2.3 <2.4.0-0`              |
//! | `^16 \|\| ^18`   | either side                     |
//!
//! A prerelease version only satisfies a comparator set that mentions a
//! prerelease on the same `major.minor.patch`.

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(0|[1-9]\d*|[xX*])(?:\.(0|[1-9]\d*|[xX*]))?(?:\.(0|[1-9]\d*|[xX*]))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
    )
    .unwrap()
});

static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

static OPERATOR_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<=|>=|~>|<|>|=|~|\^)\s+").unwrap());

static ZERO_PRE: LazyLock<Prerelease> = LazyLock::new(|| Prerelease::new("0").unwrap());

/// Error parsing a version range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// A comparator token is not a version or partial version.
    #[error("invalid comparator '{0}'")]
    InvalidComparator(String),

    /// A numeric component does not fit in 64 bits.
    #[error("version component too large in '{0}'")]
    Overflow(String),

    /// A prerelease tag is malformed.
    #[error("invalid prerelease in '{0}'")]
    InvalidPrerelease(String),
}

/// Comparison operator of a primitive comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

/// A primitive comparator such as `>=1.2.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub op: Op,
    pub version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Whether `version` satisfies this comparator (prerelease rule not applied).
    pub fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Lt => version < &self.version,
            Op::Le => version <= &self.version,
            Op::Gt => version > &self.version,
            Op::Ge => version >= &self.version,
            Op::Eq => version == &self.version,
        }
    }
}

/// Comparators that must all hold. Empty means "any version".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparatorSet {
    pub comparators: Vec<Comparator>,
}

impl ComparatorSet {
    fn matches(&self, version: &Version) -> bool {
        if !self.comparators.iter().all(|c| c.matches(version)) {
            return false;
        }
        if version.pre.is_empty() {
            return true;
        }
        self.comparators.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

/// A parsed npm-style version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReq {
    raw: String,
    sets: Vec<ComparatorSet>,
}

impl VersionReq {
    /// Parse a range such as `>=18.0.0`, `^3.0.0` or `16.x || >=18`.
    pub fn parse(range: &str) -> Result<Self, ConstraintError> {
        let sets = range
            .split("||")
            .map(parse_set)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: range.to_string(),
            sets,
        })
    }

    /// The range as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The alternatives of this range.
    pub fn sets(&self) -> &[ComparatorSet] {
        &self.sets
    }

    /// Whether `version` falls within this range. Build metadata is ignored.
    pub fn matches(&self, version: &Version) -> bool {
        let mut version = version.clone();
        version.build = BuildMetadata::EMPTY;
        self.sets.iter().any(|set| set.matches(&version))
    }
}

impl FromStr for VersionReq {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse a version reported by a tool, e.g. `v20.1.0` or ` 9.5.0\n`.
///
/// Leading `v`/`=` characters are tolerated. Returns `None` for anything
/// that is not a full `major.minor.patch` version.
pub fn parse_reported_version(reported: &str) -> Option<Version> {
    let cleaned = reported.trim().trim_start_matches(['v', '=']).trim();
    Version::parse(cleaned).ok()
}

/// Check a reported version string against a range string.
///
/// Nothing satisfies an unparsable range, and an unparsable reported
/// version satisfies nothing. Use [`VersionReq::parse`] to tell the cases
/// apart.
pub fn satisfies(reported: &str, range: &str) -> bool {
    VersionReq::parse(range).is_ok_and(|req| {
        parse_reported_version(reported).is_some_and(|v| req.matches(&v))
    })
}

/// A possibly partial version: `1`, `1.2`, `1.x`, `1.2.3-beta.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(token: &str) -> Result<Self, ConstraintError> {
        let caps = PARTIAL_RE
            .captures(token)
            .ok_or_else(|| ConstraintError::InvalidComparator(token.to_string()))?;

        let number = |idx: usize| -> Result<Option<u64>, ConstraintError> {
            match caps.get(idx).map(|m| m.as_str()) {
                None | Some("x") | Some("X") | Some("*") => Ok(None),
                Some(digits) => digits
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| ConstraintError::Overflow(token.to_string())),
            }
        };

        let major = number(1)?;
        let minor = major.map(|_| number(2)).transpose()?.flatten();
        let patch = minor.map(|_| number(3)).transpose()?.flatten();

        let pre = match (patch, caps.get(4)) {
            (Some(_), Some(m)) => Prerelease::new(m.as_str())
                .map_err(|_| ConstraintError::InvalidPrerelease(token.to_string()))?,
            _ => Prerelease::EMPTY,
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Missing components filled with zero, prerelease kept.
    fn lower_bound(&self) -> Version {
        let mut v = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        v.pre = self.pre.clone();
        v
    }
}

/// The lowest possible version for `major.minor.patch` (`X.Y.Z-0`).
fn floor(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = Version::new(major, minor, patch);
    v.pre = ZERO_PRE.clone();
    v
}

/// A set that matches nothing.
fn nothing() -> Vec<Comparator> {
    vec![Comparator::new(Op::Lt, floor(0, 0, 0))]
}

fn parse_set(raw: &str) -> Result<ComparatorSet, ConstraintError> {
    let trimmed = raw.trim();

    if let Some(caps) = HYPHEN_RE.captures(trimmed) {
        let from = Partial::parse(&caps[1])?;
        let to = Partial::parse(&caps[2])?;
        return Ok(ComparatorSet {
            comparators: hyphen(&from, &to),
        });
    }

    let normalized = OPERATOR_GAP_RE.replace_all(trimmed, "$1");
    let mut comparators = Vec::new();
    for token in normalized.split_whitespace() {
        comparators.extend(parse_comparator(token)?);
    }
    Ok(ComparatorSet { comparators })
}

fn parse_comparator(token: &str) -> Result<Vec<Comparator>, ConstraintError> {
    const OPERATORS: [&str; 8] = [">=", "<=", "~>", ">", "<", "=", "~", "^"];

    let (op, rest) = OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token));

    let partial = Partial::parse(rest)?;

    Ok(match op {
        "^" => caret(&partial),
        "~" | "~>" => tilde(&partial),
        "" | "=" => x_range(&partial),
        ">" => primitive(Op::Gt, &partial),
        ">=" => primitive(Op::Ge, &partial),
        "<" => primitive(Op::Lt, &partial),
        "<=" => primitive(Op::Le, &partial),
        _ => return Err(ConstraintError::InvalidComparator(token.to_string())),
    })
}

fn caret(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };
    let upper = match (p.minor, p.patch) {
        (None, _) => floor(major.saturating_add(1), 0, 0),
        (Some(minor), None) if major == 0 => floor(0, minor.saturating_add(1), 0),
        (Some(_), None) => floor(major.saturating_add(1), 0, 0),
        (Some(minor), Some(patch)) => {
            if major > 0 {
                floor(major.saturating_add(1), 0, 0)
            } else if minor > 0 {
                floor(0, minor.saturating_add(1), 0)
            } else {
                floor(0, 0, patch.saturating_add(1))
            }
        }
    };
    vec![
        Comparator::new(Op::Ge, p.lower_bound()),
        Comparator::new(Op::Lt, upper),
    ]
}

fn tilde(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };
    let upper = match p.minor {
        None => floor(major.saturating_add(1), 0, 0),
        Some(minor) => floor(major, minor.saturating_add(1), 0),
    };
    vec![
        Comparator::new(Op::Ge, p.lower_bound()),
        Comparator::new(Op::Lt, upper),
    ]
}

fn x_range(p: &Partial) -> Vec<Comparator> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => Vec::new(),
        (Some(major), None, _) => vec![
            Comparator::new(Op::Ge, Version::new(major, 0, 0)),
            Comparator::new(Op::Lt, floor(major.saturating_add(1), 0, 0)),
        ],
        (Some(major), Some(minor), None) => vec![
            Comparator::new(Op::Ge, Version::new(major, minor, 0)),
            Comparator::new(Op::Lt, floor(major, minor.saturating_add(1), 0)),
        ],
        (Some(_), Some(_), Some(_)) => vec![Comparator::new(Op::Eq, p.lower_bound())],
    }
}

fn primitive(op: Op, p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return match op {
            Op::Gt | Op::Lt => nothing(),
            _ => Vec::new(),
        };
    };

    if p.patch.is_some() {
        return vec![Comparator::new(op, p.lower_bound())];
    }

    let bound = match (op, p.minor) {
        (Op::Gt, None) => Comparator::new(Op::Ge, Version::new(major.saturating_add(1), 0, 0)),
        (Op::Gt, Some(minor)) => {
            Comparator::new(Op::Ge, Version::new(major, minor.saturating_add(1), 0))
        }
        (Op::Le, None) => Comparator::new(Op::Lt, floor(major.saturating_add(1), 0, 0)),
        (Op::Le, Some(minor)) => Comparator::new(Op::Lt, floor(major, minor.saturating_add(1), 0)),
        (Op::Lt, minor) => Comparator::new(Op::Lt, floor(major, minor.unwrap_or(0), 0)),
        (Op::Ge, minor) => Comparator::new(Op::Ge, Version::new(major, minor.unwrap_or(0), 0)),
        (Op::Eq, _) => return x_range(p),
    };
    vec![bound]
}

fn hyphen(from: &Partial, to: &Partial) -> Vec<Comparator> {
    let mut comparators = Vec::new();
    if from.major.is_some() {
        comparators.push(Comparator::new(Op::Ge, from.lower_bound()));
    }
    match (to.major, to.minor, to.patch) {
        (None, _, _) => {}
        (Some(major), None, _) => {
            comparators.push(Comparator::new(Op::Lt, floor(major.saturating_add(1), 0, 0)))
        }
        (Some(major), Some(minor), None) => comparators.push(Comparator::new(
            Op::Lt,
            floor(major, minor.saturating_add(1), 0),
        )),
        (Some(_), Some(_), Some(_)) => {
            comparators.push(Comparator::new(Op::Le, to.lower_bound()))
        }
    }
    comparators
}
