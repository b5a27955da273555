use regex::Regex;
use snapsave_core::MediaCandidate;

/// A candidate paired with the heuristic quality used to order it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub candidate: MediaCandidate,
    pub score: u32,
}

impl Scored {
    pub fn new(candidate: MediaCandidate, score: u32) -> Self {
        Self { candidate, score }
    }
}

/// Highest score first; ties keep their document order.
pub fn rank(mut scored: Vec<Scored>) -> Vec<MediaCandidate> {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.into_iter().map(|item| item.candidate).collect()
}

pub fn best(scored: Vec<Scored>) -> Option<MediaCandidate> {
    rank(scored).into_iter().next()
}

/// Scores a free-form label: `top` for HD/1080, the named height for
/// 720/480/360, `default` otherwise.
pub fn tier_score(label: &str, top: u32, default: u32) -> u32 {
    if label.contains("HD") || label.contains("1080") {
        top
    } else if label.contains("720") {
        720
    } else if label.contains("480") {
        480
    } else if label.contains("360") {
        360
    } else {
        default
    }
}

/// Scores a resolution column such as `720p (HD)` or `240p`.
pub fn resolution_score(resolution: &str) -> u32 {
    match tier_score(resolution, 1000, 0) {
        0 => Regex::new(r"(\d+)p")
            .ok()
            .and_then(|regex| regex.captures(resolution))
            .and_then(|captures| captures.get(1))
            .and_then(|height| height.as_str().parse().ok())
            .unwrap_or(0),
        score => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsave_core::MediaKind;

    fn labelled(resolution: &str) -> Scored {
        let mut candidate = MediaCandidate::new(format!("https://cdn/{resolution}"), MediaKind::Video);
        candidate.resolution = Some(resolution.to_string());
        Scored::new(candidate, resolution_score(resolution))
    }

    #[test]
    fn ranks_resolutions_best_first() {
        let ranked = rank(
            ["360p", "HD", "720p", "480p"]
                .into_iter()
                .map(labelled)
                .collect(),
        );
        let order: Vec<_> = ranked
            .iter()
            .filter_map(|media| media.resolution.as_deref())
            .collect();
        assert_eq!(order, ["HD", "720p", "480p", "360p"]);
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let ranked = rank(vec![labelled("720p"), labelled("720p (HD)"), labelled("1080p")]);
        let order: Vec<_> = ranked
            .iter()
            .filter_map(|media| media.resolution.as_deref())
            .collect();
        assert_eq!(order, ["720p (HD)", "1080p", "720p"]);
    }

    #[test]
    fn resolution_score_parses_other_heights() {
        assert_eq!(resolution_score("1080p"), 1000);
        assert_eq!(resolution_score("240p"), 240);
        assert_eq!(resolution_score("144p"), 144);
        assert_eq!(resolution_score("audio"), 0);
        assert_eq!(resolution_score(""), 0);
    }

    #[test]
    fn tier_score_uses_default_for_unknown_labels() {
        assert_eq!(tier_score("Download", 1080, 500), 500);
        assert_eq!(tier_score("Download HD", 1080, 500), 1080);
        assert_eq!(tier_score("MP4 480", 1000, 360), 480);
    }

    #[test]
    fn best_picks_highest_score() {
        let pick = best(vec![labelled("360p"), labelled("720p")]).unwrap();
        assert_eq!(pick.resolution.as_deref(), Some("720p"));
        assert!(best(Vec::new()).is_none());
    }
}
