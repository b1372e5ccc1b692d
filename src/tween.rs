//! Eased property tweens for page elements.
//!
//! Every `(element, property)` pair has one slot on the [`TweenBoard`].
//! Starting a tween on an occupied slot replaces the running one, so the
//! latest trigger always decides where a property ends up.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease in.
    Power1In,
    /// Quadratic ease out; the default when no ease is named.
    Power1Out,
    Power1InOut,
    /// Cubic ease in.
    Power2In,
    /// Cubic ease out.
    Power2Out,
    Power2InOut,
    /// Overshoots the target by `overshoot` before settling.
    BackOut(f32),
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::BackOut(s) => {
                let p = t - 1.0;
                p * p * ((s + 1.0) * p + s) + 1.0
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    /// Vertical offset in CSS pixels.
    Y,
    Scale,
    /// Degrees.
    Rotation,
    Opacity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    To(f32),
    /// Relative to the value when the tween becomes active.
    By(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub property: Property,
    pub target: Target,
    /// Seconds per cycle.
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    pub yoyo: bool,
    pub repeat: Repeat,
}

impl TweenSpec {
    pub fn to(property: Property, value: f32, duration: f32, ease: Ease) -> Self {
        Self {
            property,
            target: Target::To(value),
            duration,
            delay: 0.0,
            ease,
            yoyo: false,
            repeat: Repeat::Times(0),
        }
    }

    pub fn by(property: Property, delta: f32, duration: f32, ease: Ease) -> Self {
        Self {
            target: Target::By(delta),
            ..Self::to(property, 0.0, duration, ease)
        }
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn yoyo(mut self, repeat: Repeat) -> Self {
        self.yoyo = true;
        self.repeat = repeat;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementState {
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl ElementState {
    pub fn get(&self, p: Property) -> f32 {
        match p {
            Property::Y => self.y,
            Property::Scale => self.scale,
            Property::Rotation => self.rotation,
            Property::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, p: Property, v: f32) {
        match p {
            Property::Y => self.y = v,
            Property::Scale => self.scale = v,
            Property::Rotation => self.rotation = v,
            Property::Opacity => self.opacity = v,
        }
    }

    /// CSS `transform` value for the geometric properties.
    pub fn css_transform(&self) -> String {
        format!(
            "translateY({:.3}px) scale({:.4}) rotate({:.3}deg)",
            self.y, self.scale, self.rotation
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

#[derive(Clone, Debug)]
struct Tween {
    spec: TweenSpec,
    elapsed: f32,
    /// `(from, to)`, captured when the delay runs out.
    span: Option<(f32, f32)>,
}

enum Sample {
    Waiting,
    Running(f32),
    Done(f32),
}

impl Tween {
    fn sample(&mut self, current: f32) -> Sample {
        let local = self.elapsed - self.spec.delay;
        if local < 0.0 {
            return Sample::Waiting;
        }
        let (from, to) = *self.span.get_or_insert_with(|| match self.spec.target {
            Target::To(v) => (current, v),
            Target::By(d) => (current, current + d),
        });
        let d = self.spec.duration;
        let end = match self.spec.repeat {
            Repeat::Times(n) if self.spec.yoyo && n % 2 == 1 => from,
            _ => to,
        };
        if d <= 0.0 {
            return Sample::Done(end);
        }
        let cycle = (local / d).floor();
        if let Repeat::Times(n) = self.spec.repeat {
            if cycle >= (n + 1) as f32 {
                return Sample::Done(end);
            }
        }
        let mut p = (local - cycle * d) / d;
        if self.spec.yoyo && cycle as u64 % 2 == 1 {
            p = 1.0 - p;
        }
        Sample::Running(from + (to - from) * self.spec.ease.apply(p))
    }
}

#[derive(Debug, Default)]
pub struct TweenBoard {
    elements: Vec<ElementState>,
    slots: BTreeMap<(ElementId, Property), Tween>,
}

impl TweenBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, initial: ElementState) -> ElementId {
        self.elements.push(initial);
        ElementId(self.elements.len() as u32 - 1)
    }

    pub fn state(&self, id: ElementId) -> ElementState {
        self.elements[id.0 as usize]
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Starts `spec` on `element`. Returns true if it replaced a running tween.
    pub fn start(&mut self, element: ElementId, spec: TweenSpec) -> bool {
        let tween = Tween {
            spec,
            elapsed: 0.0,
            span: None,
        };
        let replaced = self.slots.insert((element, spec.property), tween).is_some();
        // Zero delay tweens capture their start value right away.
        self.advance_slot(element, spec.property, 0.0);
        replaced
    }

    pub fn is_animating(&self, element: ElementId, property: Property) -> bool {
        self.slots.contains_key(&(element, property))
    }

    pub fn active(&self) -> usize {
        self.slots.len()
    }

    /// Advances every tween by `dt` seconds and returns the elements that changed.
    pub fn advance(&mut self, dt: f32) -> Vec<ElementId> {
        let keys: Vec<_> = self.slots.keys().copied().collect();
        let mut changed = Vec::new();
        for (element, property) in keys {
            if self.advance_slot(element, property, dt) {
                changed.push(element);
            }
        }
        // Slots are ordered by element, so duplicates are adjacent.
        changed.dedup();
        changed
    }

    fn advance_slot(&mut self, element: ElementId, property: Property, dt: f32) -> bool {
        let Some(tween) = self.slots.get_mut(&(element, property)) else {
            return false;
        };
        tween.elapsed += dt.max(0.0);
        let state = &mut self.elements[element.0 as usize];
        match tween.sample(state.get(property)) {
            Sample::Waiting => false,
            Sample::Running(v) => {
                state.set(property, v);
                true
            }
            Sample::Done(v) => {
                state.set(property, v);
                self.slots.remove(&(element, property));
                true
            }
        }
    }
}
