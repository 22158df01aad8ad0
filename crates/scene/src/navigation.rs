//! Navigation signals coming from the scroll layer.

/// What the caller tells the scene between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationSignal {
    /// Section `K` became active: focus body `K` outright.
    Section(usize),
    /// Overall scroll progress in `[0, 1]`.
    Progress(f32),
}

/// A progress value split into the pair of bodies it lies between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSplit {
    pub current: usize,
    pub next: usize,
    pub t: f32,
}

/// Split progress `p` over `count` bodies. `p` is clamped to `[0, 1]`; `None` when
/// there are no bodies.
pub fn decompose_progress(p: f32, count: usize) -> Option<ProgressSplit> {
    if count == 0 {
        return None;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let sp = p * (count - 1) as f32;
    let current = (sp.floor() as usize).min(count - 1);
    let next = (current + 1).min(count - 1);
    Some(ProgressSplit {
        current,
        next,
        t: sp - current as f32,
    })
}
