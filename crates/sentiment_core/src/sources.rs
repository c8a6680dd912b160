use crate::progress::Badge;
use crate::SourceResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub url: String,
    pub badge: Badge,
    pub preview: String,
}

/// Per-source fetch outcomes with running ok/blocked tallies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceResultsView {
    pub rows: Vec<SourceRow>,
    pub ok_count: usize,
    pub bad_count: usize,
}

impl SourceResultsView {
    /// Rebuilds the list and both tallies from scratch in a single pass.
    pub fn update(&mut self, items: &[SourceResult]) {
        self.rows.clear();
        self.ok_count = 0;
        self.bad_count = 0;
        for item in items {
            let badge = if item.ok {
                self.ok_count += 1;
                Badge::ok("OK")
            } else {
                self.bad_count += 1;
                Badge::bad("BLOCKED/ERROR")
            };
            self.rows.push(SourceRow {
                url: item.url.clone(),
                badge,
                preview: item.preview.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::BadgeTone;

    fn item(url: &str, ok: bool) -> SourceResult {
        SourceResult {
            url: url.to_string(),
            ok,
            preview: String::new(),
        }
    }

    #[test]
    fn tallies_always_sum_to_item_count() {
        let mut view = SourceResultsView::default();
        for n in 0..12 {
            let items: Vec<_> = (0..n).map(|i| item("x.com", i % 3 != 0)).collect();
            view.update(&items);
            assert_eq!(view.ok_count + view.bad_count, items.len());
            assert_eq!(view.rows.len(), items.len());
        }
    }

    #[test]
    fn rebuild_replaces_previous_rows() {
        let mut view = SourceResultsView::default();
        view.update(&[item("a.com", true), item("b.com", false)]);
        view.update(&[item("c.com", false)]);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].badge.tone, BadgeTone::Bad);
        assert_eq!((view.ok_count, view.bad_count), (0, 1));
    }
}
