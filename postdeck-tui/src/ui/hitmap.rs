use postdeck_types::PostId;
use ratatui::layout::Rect;

/// Something on screen that reacts to a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Card(PostId),
    LearnMore(PostId),
    /// Modal content; absorbs clicks
    ModalBody,
    ModalClose,
    /// Everything behind the modal
    Backdrop,
}

/// Clickable regions in paint order. Later regions sit on top.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// Topmost target under the given cell
    pub fn resolve(&self, column: u16, row: u16) -> Option<Target> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| contains(*area, column, row))
            .map(|(_, target)| *target)
    }

    /// First region registered for `target`
    pub fn area_of(&self, target: Target) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topmost_region_wins() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 20, 10), Target::Card(1));
        map.push(Rect::new(2, 8, 10, 1), Target::LearnMore(1));

        assert_eq!(map.resolve(5, 8), Some(Target::LearnMore(1)));
        assert_eq!(map.resolve(5, 3), Some(Target::Card(1)));
        assert_eq!(map.resolve(25, 3), None);
    }

    #[test]
    fn test_modal_layers_over_cards() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 40, 20), Target::Card(7));
        map.push(Rect::new(0, 0, 80, 40), Target::Backdrop);
        map.push(Rect::new(10, 5, 60, 30), Target::ModalBody);
        map.push(Rect::new(65, 5, 3, 1), Target::ModalClose);

        assert_eq!(map.resolve(1, 1), Some(Target::Backdrop));
        assert_eq!(map.resolve(20, 10), Some(Target::ModalBody));
        assert_eq!(map.resolve(66, 5), Some(Target::ModalClose));
    }

    #[test]
    fn test_edges_are_exclusive_and_empty_rects_skipped() {
        let mut map = HitMap::default();
        map.push(Rect::new(5, 5, 2, 2), Target::ModalBody);
        map.push(Rect::new(0, 0, 0, 3), Target::Backdrop);

        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve(6, 6), Some(Target::ModalBody));
        assert_eq!(map.resolve(7, 6), None);
        assert_eq!(map.resolve(6, 7), None);
        assert_eq!(map.area_of(Target::ModalBody), Some(Rect::new(5, 5, 2, 2)));
    }
}
