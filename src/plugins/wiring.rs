//! Wiring hints for pairs of filled slots.

use crate::core::category::Category;
use crate::core::slots::SlotMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WiringHint {
    pub categories: [Category; 2],
    pub hint: &'static str,
}

static HINTS: [WiringHint; 8] = [
    WiringHint {
        categories: [Category::Fc, Category::Esc],
        hint: "Connect ESC signal wire to FC motor outputs (M1-M4). If 4-in-1 ESC, use 8-pin ribbon cable or solder pads.",
    },
    WiringHint {
        categories: [Category::Fc, Category::Rx],
        hint: "Connect RX to a spare UART on the FC (TX to RX, RX to TX). ELRS receivers typically need a single UART.",
    },
    WiringHint {
        categories: [Category::Fc, Category::Vtx],
        hint: "Connect VTX to a UART TX pad for SmartAudio/Tramp control. Power from VBAT or 9V pad depending on VTX voltage rating.",
    },
    WiringHint {
        categories: [Category::Fc, Category::Camera],
        hint: "Analog camera: connect to FC camera input pad. DJI/HDZero: connect to Air Unit which handles camera signal.",
    },
    WiringHint {
        categories: [Category::Esc, Category::Motors],
        hint: "Solder 3 motor wires to ESC motor pads. Swap any 2 wires to reverse direction if needed.",
    },
    WiringHint {
        categories: [Category::Battery, Category::Esc],
        hint: "Battery XT60/XT30 connects to ESC power input. Add capacitor (1000uF low-ESR) across battery pads to reduce voltage spikes.",
    },
    WiringHint {
        categories: [Category::Vtx, Category::VtxAntenna],
        hint: "Connect antenna to VTX SMA/MMCX/UFL connector. NEVER power VTX without antenna attached: it will burn out.",
    },
    WiringHint {
        categories: [Category::Rx, Category::RxAntenna],
        hint: "Mount RX antenna(s) at 90-degree angles for best reception. Keep away from carbon fiber and ESC noise.",
    },
];

pub fn all_hints() -> &'static [WiringHint] {
    &HINTS
}

/// Hints whose two slots are both filled, in table order.
pub fn hints_for(slots: &SlotMap) -> Vec<WiringHint> {
    HINTS
        .iter()
        .filter(|h| h.categories.iter().all(|c| slots.is_filled(*c)))
        .copied()
        .collect()
}
