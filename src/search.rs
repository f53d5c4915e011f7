use crate::videos::VideoRecord;
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Recent,
    /// By display name, case-insensitive.
    Alphabetical,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortKey::Recent),
            "alphabetical" | "alpha" | "a-z" => Ok(SortKey::Alphabetical),
            other => Err(format!(
                "unknown sort key '{other}', expected 'recent' or 'alphabetical'"
            )),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Recent => write!(f, "recent"),
            SortKey::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

fn matches(video: &VideoRecord, needle: &str) -> bool {
    video.title.to_lowercase().contains(needle)
        || video
            .name
            .as_ref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
        || video
            .description
            .as_ref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

/// Unicode collation on the lowercased names, so accented letters sit next
/// to their base letter. Exact ties fall back to the raw strings.
fn compare_names(collator: &mut Collator, a: &VideoRecord, b: &VideoRecord) -> Ordering {
    let (a, b) = (a.display_name(), b.display_name());
    collator
        .collate(a.to_lowercase().as_str(), b.to_lowercase().as_str())
        .then_with(|| a.cmp(b))
}

/// Filtered and ordered copy of `videos`. An empty (or blank) query keeps
/// everything; the input is left untouched.
///
/// "Recent" orders by `seq`, newest first, whatever order `videos` came in.
/// For the store's own list that is the same as its head-first order.
pub fn view(videos: &[VideoRecord], query: &str, sort: SortKey) -> Vec<VideoRecord> {
    let needle = query.trim().to_lowercase();

    let mut output = videos
        .iter()
        .filter(|video| needle.is_empty() || matches(video, &needle))
        .cloned()
        .collect::<Vec<_>>();

    match sort {
        SortKey::Recent => output.sort_by(|a, b| b.seq.cmp(&a.seq)),
        SortKey::Alphabetical => {
            let mut collator = Collator::default();
            output.sort_by(|a, b| compare_names(&mut collator, a, b))
        }
    }

    output
}
