//! Pointer responders for the page's floating badges and module cards.
//!
//! Responders only decide which tweens to start; the browser layer feeds
//! them pointer events and copies element state into CSS.

use crate::tween::{Ease, ElementId, ElementState, Property, Repeat, TweenBoard, TweenSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointer {
    Enter,
    Leave,
    Click,
}

const HOVER: f32 = 0.3;
const BOUNCE: Ease = Ease::BackOut(1.7);

/// Floating droid badge: bobs forever, grows on hover, spins on click.
#[derive(Clone, Copy, Debug)]
pub struct DroidBadge {
    pub element: ElementId,
}

impl DroidBadge {
    pub fn install(board: &mut TweenBoard) -> Self {
        let element = board.add_element(ElementState::default());
        board.start(
            element,
            TweenSpec::to(Property::Y, -10.0, 2.0, Ease::Power2InOut).yoyo(Repeat::Forever),
        );
        Self { element }
    }

    pub fn respond(&self, board: &mut TweenBoard, event: Pointer) {
        let spec = match event {
            Pointer::Enter => TweenSpec::to(Property::Scale, 1.2, HOVER, BOUNCE),
            Pointer::Leave => TweenSpec::to(Property::Scale, 1.0, HOVER, BOUNCE),
            Pointer::Click => TweenSpec::by(Property::Rotation, 360.0, 1.0, Ease::Power2Out),
        };
        board.start(self.element, spec);
    }
}

/// One module card with its optional icon and glow children.
#[derive(Clone, Copy, Debug)]
pub struct ModuleCard {
    pub index: usize,
    pub card: ElementId,
    pub icon: Option<ElementId>,
    pub glow: Option<ElementId>,
}

impl ModuleCard {
    /// Registers the card and starts its idle float, staggered by `index`.
    pub fn install(board: &mut TweenBoard, index: usize, has_icon: bool, has_glow: bool) -> Self {
        let card = board.add_element(ElementState::default());
        let icon = has_icon.then(|| board.add_element(ElementState::default()));
        let glow = has_glow.then(|| {
            board.add_element(ElementState {
                opacity: 0.0,
                ..Default::default()
            })
        });

        let i = index as f32;
        board.start(
            card,
            TweenSpec::to(Property::Y, -5.0, 2.0 + i * 0.2, Ease::Power2InOut)
                .delay(i * 0.1)
                .yoyo(Repeat::Forever),
        );
        Self { index, card, icon, glow }
    }

    pub fn respond(&self, board: &mut TweenBoard, event: Pointer) {
        match event {
            Pointer::Enter => self.hover(board, 1.05, 1.2, 10.0, 0.1),
            Pointer::Leave => self.hover(board, 1.0, 1.0, 0.0, 0.0),
            Pointer::Click => {
                board.start(
                    self.card,
                    TweenSpec::to(Property::Scale, 0.95, 0.1, Ease::Power2InOut).yoyo(Repeat::Times(1)),
                );
            }
        }
    }

    fn hover(&self, board: &mut TweenBoard, card_scale: f32, icon_scale: f32, icon_turn: f32, glow: f32) {
        board.start(self.card, TweenSpec::to(Property::Scale, card_scale, HOVER, Ease::Power2Out));
        if let Some(icon) = self.icon {
            board.start(icon, TweenSpec::to(Property::Scale, icon_scale, HOVER, BOUNCE));
            board.start(icon, TweenSpec::to(Property::Rotation, icon_turn, HOVER, BOUNCE));
        }
        if let Some(el) = self.glow {
            board.start(el, TweenSpec::to(Property::Opacity, glow, HOVER, Ease::Power1Out));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(board: &mut TweenBoard, seconds: f32) {
        for _ in 0..(seconds / 0.01) as usize {
            board.advance(0.01);
        }
    }

    #[test]
    fn badge_enter_then_leave_settles_on_leave() {
        let mut board = TweenBoard::new();
        let badge = DroidBadge::install(&mut board);
        badge.respond(&mut board, Pointer::Enter);
        badge.respond(&mut board, Pointer::Leave);
        settle(&mut board, 1.0);
        assert_eq!(board.state(badge.element).scale, 1.0);
        // Idle float keeps running alongside.
        assert!(board.is_animating(badge.element, Property::Y));
    }

    #[test]
    fn click_spins_a_full_turn() {
        let mut board = TweenBoard::new();
        let badge = DroidBadge::install(&mut board);
        badge.respond(&mut board, Pointer::Click);
        settle(&mut board, 1.2);
        assert_eq!(board.state(badge.element).rotation, 360.0);
    }

    #[test]
    fn card_hover_drives_children() {
        let mut board = TweenBoard::new();
        let card = ModuleCard::install(&mut board, 2, true, true);
        card.respond(&mut board, Pointer::Enter);
        settle(&mut board, 0.5);
        let icon = board.state(card.icon.unwrap());
        assert_eq!((icon.scale, icon.rotation), (1.2, 10.0));
        assert_eq!(board.state(card.glow.unwrap()).opacity, 0.1);
        assert_eq!(board.state(card.card).scale, 1.05);

        card.respond(&mut board, Pointer::Leave);
        settle(&mut board, 0.5);
        assert_eq!(board.state(card.glow.unwrap()).opacity, 0.0);
        assert_eq!(board.state(card.icon.unwrap()).rotation, 0.0);
    }

    #[test]
    fn glow_fades_in_with_default_ease() {
        let mut board = TweenBoard::new();
        let card = ModuleCard::install(&mut board, 0, false, true);
        card.respond(&mut board, Pointer::Enter);
        board.advance(0.15);
        let opacity = board.state(card.glow.unwrap()).opacity;
        assert!((opacity - 0.075).abs() < 1e-5, "glow opacity {opacity}");
    }

    #[test]
    fn card_without_children_still_responds() {
        let mut board = TweenBoard::new();
        let card = ModuleCard::install(&mut board, 0, false, false);
        card.respond(&mut board, Pointer::Enter);
        card.respond(&mut board, Pointer::Click);
        settle(&mut board, 0.5);
        assert_eq!(board.element_count(), 1);
        assert_eq!(board.state(card.card).scale, 1.0);
    }
}
