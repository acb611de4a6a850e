// src/render/history.rs
//
// Two G-buffer slots in strict alternation. The slot written in frame N is read
// as "previous" in frame N+1 and is never read and written in the same frame.

use crate::error::Result;
use crate::render::camera::CameraMatrices;
use crate::render::gbuffer::GBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

pub struct HistorySlot {
    pub gbuffer: GBuffer,
    /// Camera the slot was rendered with; `None` until first written.
    pub camera: Option<CameraMatrices>,
}

impl HistorySlot {
    fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            gbuffer: GBuffer::new(width, height)?,
            camera: None,
        })
    }
}

pub struct FrameHistory {
    slots: [HistorySlot; 2],
    current: Slot,
    /// False for exactly the first frame after creation, resize or invalidation.
    valid: bool,
}

impl FrameHistory {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            slots: [HistorySlot::new(width, height)?, HistorySlot::new(width, height)?],
            current: Slot::A,
            valid: false,
        })
    }

    /// Back to slot A with no usable history, keeping the allocations.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.camera = None;
        }
        self.current = Slot::A;
        self.valid = false;
    }

    /// Forces the next frame to render without history.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    /// The slot most recently committed, regardless of validity.
    pub fn latest(&self) -> &HistorySlot {
        &self.slots[self.current.other().index()]
    }

    pub fn previous(&self) -> Option<&HistorySlot> {
        if !self.valid {
            return None;
        }
        let prev = &self.slots[self.current.other().index()];
        prev.camera.as_ref().map(|_| prev)
    }

    /// The slot written this frame and, when history is usable, the slot read.
    pub fn split_mut(&mut self) -> (&mut HistorySlot, Option<&HistorySlot>) {
        let valid = self.valid;
        let (a, b) = self.slots.split_at_mut(1);
        let (write, read) = match self.current {
            Slot::A => (&mut a[0], &b[0]),
            Slot::B => (&mut b[0], &a[0]),
        };
        let read = if valid && read.camera.is_some() { Some(read) } else { None };
        (write, read)
    }

    /// Ends the frame: stamps the written slot with its camera and swaps roles.
    pub fn commit(&mut self, camera: CameraMatrices) {
        self.slots[self.current.index()].camera = Some(camera);
        self.current = self.current.other();
        self.valid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn cam() -> CameraMatrices {
        CameraMatrices {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    #[test]
    fn fresh_history_has_no_previous() {
        let mut h = FrameHistory::new(4, 4).unwrap();
        assert!(h.previous().is_none());
        assert!(h.split_mut().1.is_none());
        assert_eq!(h.current_slot(), Slot::A);
    }

    #[test]
    fn commit_alternates_slots() {
        let mut h = FrameHistory::new(4, 4).unwrap();
        h.split_mut().0.gbuffer.texels_mut()[0].material_id = 9;
        h.commit(cam());
        assert_eq!(h.current_slot(), Slot::B);

        let (write, read) = h.split_mut();
        let read = read.expect("history should be readable after one frame");
        assert_eq!(read.gbuffer.texels()[0].material_id, 9);
        assert_eq!(write.gbuffer.texels()[0].material_id, 0);

        h.commit(cam());
        assert_eq!(h.current_slot(), Slot::A);
    }

    #[test]
    fn invalidation_lasts_one_frame() {
        let mut h = FrameHistory::new(4, 4).unwrap();
        h.commit(cam());
        h.invalidate();
        assert!(h.previous().is_none());
        h.commit(cam());
        assert!(h.previous().is_some());
    }

    #[test]
    fn reset_restores_alternation_and_drops_history() {
        let mut h = FrameHistory::new(4, 4).unwrap();
        h.commit(cam());
        h.reset();
        assert_eq!(h.current_slot(), Slot::A);
        assert!(h.previous().is_none());
        assert!(h.latest().camera.is_none());

        h.commit(cam());
        assert!(h.previous().is_some());
    }
}
