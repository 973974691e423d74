use std::fmt::Write;

use catalog_core::{
    DashboardViewModel, FetchState, ListingItem, StatsSnapshot, STAT_EDITORS, STAT_JOURNALS,
    STAT_PEER_REVIEWERS, STAT_RESOURCES,
};

const STAT_LABELS: [(&str, &str); 4] = [
    (STAT_JOURNALS, "Active journals"),
    (STAT_RESOURCES, "Resources"),
    (STAT_PEER_REVIEWERS, "Peer reviewers"),
    (STAT_EDITORS, "Editors"),
];

pub(crate) fn render(view: &DashboardViewModel, rendered_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Journal catalog ({rendered_at})");
    let _ = writeln!(out);
    let _ = writeln!(out, "== Statistics ==");
    render_state(&mut out, &view.stats, render_stats);
    for (listing, state) in &view.listings {
        let _ = writeln!(out);
        let _ = writeln!(out, "== {} journals ==", capitalize(&listing.to_string()));
        render_state(&mut out, state, render_items);
    }
    out
}

fn render_state<T>(out: &mut String, state: &FetchState<T>, body: fn(&mut String, &T)) {
    match state {
        FetchState::Loading => {
            let _ = writeln!(out, "  Loading...");
        }
        FetchState::Failed { reason, .. } => {
            let _ = writeln!(out, "  Could not load data: {reason}");
        }
        FetchState::Ready(data) => body(out, data),
    }
}

fn render_stats(out: &mut String, snapshot: &StatsSnapshot) {
    for (name, count) in snapshot.iter() {
        let label = STAT_LABELS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, label)| *label)
            .unwrap_or(name);
        let _ = writeln!(out, "  {label:<16}{count:>8}");
    }
}

fn render_items(out: &mut String, items: &Vec<ListingItem>) {
    if items.is_empty() {
        let _ = writeln!(out, "  No journals found.");
        return;
    }
    for item in items {
        let mut badges = Vec::new();
        if item.featured {
            badges.push("featured");
        }
        if item.open_access {
            badges.push("open access");
        }
        let _ = write!(out, "  {}", item.title);
        if !item.publisher.is_empty() {
            let _ = write!(out, " / {}", item.publisher);
        }
        let _ = write!(out, " ({} views)", item.views_count);
        if !badges.is_empty() {
            let _ = write!(out, " [{}]", badges.join(", "));
        }
        let _ = writeln!(out);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use catalog_core::{
        DashboardViewModel, FetchState, ListingItem, ListingView, StatsSnapshot, STAT_JOURNALS,
    };

    fn view(
        stats: FetchState<StatsSnapshot>,
        featured: FetchState<Vec<ListingItem>>,
    ) -> DashboardViewModel {
        DashboardViewModel {
            stats,
            listings: vec![(ListingView::Featured, featured)],
            settled: true,
            dirty: false,
        }
    }

    #[test]
    fn each_state_renders_distinctly() {
        let ready = render(
            &view(
                FetchState::Ready([(STAT_JOURNALS, 12)].into_iter().collect()),
                FetchState::Loading,
            ),
            "now",
        );
        assert!(ready.contains("Active journals"));
        assert!(ready.contains("12"));
        assert!(ready.contains("== Featured journals =="));
        assert!(ready.contains("Loading..."));

        let failed = render(
            &view(
                FetchState::failed("timeout", StatsSnapshot::zeroed([STAT_JOURNALS])),
                FetchState::Ready(Vec::new()),
            ),
            "now",
        );
        assert!(failed.contains("Could not load data: timeout"));
        assert!(!failed.contains("Active journals"));
        assert!(failed.contains("No journals found."));
    }

    #[test]
    fn items_show_publisher_and_badges() {
        let item = ListingItem {
            id: "1".to_string(),
            title: "Annals of Cardiology".to_string(),
            publisher: "Meridian Press".to_string(),
            views_count: 1840,
            featured: true,
            open_access: true,
            ..ListingItem::default()
        };
        let out = render(
            &view(FetchState::Loading, FetchState::Ready(vec![item])),
            "now",
        );
        assert!(out.contains(
            "Annals of Cardiology / Meridian Press (1840 views) [featured, open access]"
        ));
    }
}
