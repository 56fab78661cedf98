//! Fuzzy product-name resolution.
//!
//! Three tiers, each tried only when the previous one found nothing:
//! exact normalized name, singularized token overlap, raw substring. Within a
//! tier the first candidate in collection order wins; there is no scoring.

use crate::domain::{CartLine, Product};

use super::normalize::{normalize, singularize, tokens};

/// Anything the resolver can match a spoken fragment against.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for Product {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for CartLine {
    fn id(&self) -> &str {
        &self.product.id
    }
    fn name(&self) -> &str {
        &self.product.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Singular,
    Partial,
}

#[derive(Debug, PartialEq)]
pub enum MatchResult<'a, T> {
    Exact(&'a T),
    Fuzzy { candidate: &'a T, tier: MatchTier },
    /// Nothing matched, but this candidate looks close enough to offer.
    Suggestion(&'a T),
    NoMatch,
}

impl<'a, T> MatchResult<'a, T> {
    /// The resolved candidate; suggestions do not count.
    pub fn matched(&self) -> Option<&'a T> {
        match self {
            MatchResult::Exact(candidate) => Some(*candidate),
            MatchResult::Fuzzy { candidate, .. } => Some(*candidate),
            MatchResult::Suggestion(_) | MatchResult::NoMatch => None,
        }
    }

    pub fn suggestion(&self) -> Option<&'a T> {
        match self {
            MatchResult::Suggestion(candidate) => Some(*candidate),
            _ => None,
        }
    }
}

struct Prepared<'a, T> {
    candidate: &'a T,
    normalized: String,
    tokens: Vec<String>,
}

/// Resolves `fragment` against `candidates`, falling back to a suggestion
/// when no tier matches.
pub fn resolve<'a, T: Named>(fragment: &str, candidates: &[&'a T]) -> MatchResult<'a, T> {
    let wanted = normalize(fragment);
    if wanted.is_empty() {
        return MatchResult::NoMatch;
    }
    let prepared: Vec<Prepared<'a, T>> = candidates
        .iter()
        .map(|&candidate| Prepared {
            candidate,
            normalized: normalize(candidate.name()),
            tokens: tokens(candidate.name()),
        })
        .collect();

    if let Some(hit) = prepared.iter().find(|p| p.normalized == wanted) {
        return MatchResult::Exact(hit.candidate);
    }

    let fragment_tokens: Vec<String> = wanted.split_whitespace().map(str::to_string).collect();

    let singular_fragment: Vec<String> = fragment_tokens.iter().map(|t| singularize(t)).collect();
    let singular_hit = prepared.iter().find(|p| {
        let singular_candidate: Vec<String> = p.tokens.iter().map(|t| singularize(t)).collect();
        singular_fragment.iter().any(|f| {
            singular_candidate
                .iter()
                .any(|c| f == c || c.contains(f.as_str()) || f.contains(c.as_str()))
        })
    });
    if let Some(hit) = singular_hit {
        return MatchResult::Fuzzy { candidate: hit.candidate, tier: MatchTier::Singular };
    }

    let partial_hit = prepared.iter().find(|p| {
        fragment_tokens
            .iter()
            .filter(|f| f.chars().count() > 2)
            .any(|f| p.tokens.iter().any(|c| c.contains(f.as_str())))
    });
    if let Some(hit) = partial_hit {
        return MatchResult::Fuzzy { candidate: hit.candidate, tier: MatchTier::Partial };
    }

    match suggest(&fragment_tokens, &prepared) {
        Some(candidate) => MatchResult::Suggestion(candidate),
        None => MatchResult::NoMatch,
    }
}

// A fragment token sharing its first three letters with a candidate token.
fn suggest<'a, T>(fragment_tokens: &[String], prepared: &[Prepared<'a, T>]) -> Option<&'a T> {
    let stems: Vec<String> = fragment_tokens
        .iter()
        .filter(|f| f.chars().count() > 2)
        .map(|f| f.chars().take(3).collect())
        .collect();
    prepared
        .iter()
        .find(|p| stems.iter().any(|stem| p.tokens.iter().any(|c| c.starts_with(stem.as_str()))))
        .map(|p| p.candidate)
}
