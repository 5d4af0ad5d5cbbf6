//! The static compatibility rule table.
//!
//! Each rule names an ordered category pair and a predicate over the two
//! assigned components. A predicate returns `Some(message)` when the pair is
//! incompatible and `None` otherwise, including when either side lacks the
//! spec it needs. Predicates never panic.

use crate::core::category::Category;
use crate::core::compat::voltage::{parse_s_count, parse_voltage_range};
use crate::core::component::{Component, leading_int};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type CheckFn = fn(&Component, &Component) -> Option<String>;

#[derive(Debug, Clone, Copy)]
pub struct CompatibilityRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Beginner-level background for the relationship being checked.
    pub explanation: &'static str,
    pub categories: (Category, Category),
    pub severity: Severity,
    pub check: CheckFn,
}

impl CompatibilityRule {
    pub fn involves(&self, category: Category) -> bool {
        self.categories.0 == category || self.categories.1 == category
    }
}

pub fn rules() -> &'static [CompatibilityRule] {
    &RULES
}

pub fn find_rule(id: &str) -> Option<&'static CompatibilityRule> {
    RULES.iter().find(|r| r.id == id)
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Both sides carry `key` and the values differ.
fn mismatch(a: &Component, b: &Component, key: &str) -> Option<(String, String)> {
    let (va, vb) = (a.spec_text(key)?, b.spec_text(key)?);
    (va != vb).then_some((va, vb))
}

fn frame_prop_size(frame: &Component, prop: &Component) -> Option<String> {
    let (f, p) = mismatch(frame, prop, "size")?;
    Some(format!(
        "Frame is {f}\" but props are {p}\". They must match: a {f}\" frame needs {f}\" propellers."
    ))
}

fn motor_prop_shaft(motor: &Component, prop: &Component) -> Option<String> {
    let (m, p) = mismatch(motor, prop, "shaftSize")?;
    Some(format!(
        "Motor has {m} shaft but props need {p} shaft. Props won't mount on motors."
    ))
}

fn motor_frame_size(motor: &Component, frame: &Component) -> Option<String> {
    let motor_size = motor.spec_text("size")?;
    let frame_size = frame.spec_text("size")?;
    let stator = leading_int(&motor_size)?;
    let (min, max, label) = match frame_size.as_str() {
        "3" => (1103, 1507, "1103-1507"),
        "5" => (2205, 2407, "2205-2407"),
        "7" => (2505, 2908, "2505-2908"),
        _ => return None,
    };
    if stator < min || stator > max {
        return Some(format!(
            "Motor {motor_size} is unusual for a {frame_size}\" frame. Typical motors for {frame_size}\" are {label} stator size."
        ));
    }
    None
}

fn fc_frame_mount(fc: &Component, frame: &Component) -> Option<String> {
    let (a, b) = mismatch(fc, frame, "mountPattern")?;
    Some(format!(
        "FC mount is {a}mm but frame takes {b}mm. FC won't fit in the frame without an adapter."
    ))
}

fn esc_frame_mount(esc: &Component, frame: &Component) -> Option<String> {
    let (a, b) = mismatch(esc, frame, "mountPattern")?;
    Some(format!(
        "ESC mount is {a}mm but frame takes {b}mm. ESC won't fit in the frame stack."
    ))
}

/// Battery cell count outside the device's supported range.
fn battery_out_of_range(battery: &Component, device: &Component) -> Option<(String, String)> {
    let battery_v = battery.spec_text("voltage")?;
    let device_v = device.spec_text("voltage")?;
    let cells = parse_s_count(&battery_v)?;
    let range = parse_voltage_range(&device_v)?;
    (!range.contains(cells)).then_some((battery_v, device_v))
}

fn battery_esc_voltage(battery: &Component, esc: &Component) -> Option<String> {
    let (b, e) = battery_out_of_range(battery, esc)?;
    Some(format!(
        "Battery is {b} but ESC supports {e}. This will damage the ESC!"
    ))
}

fn battery_fc_voltage(battery: &Component, fc: &Component) -> Option<String> {
    let (b, f) = battery_out_of_range(battery, fc)?;
    Some(format!(
        "Battery is {b} but FC supports {f}. Voltage mismatch, risk of damage!"
    ))
}

fn battery_motor_voltage(battery: &Component, motor: &Component) -> Option<String> {
    let (b, m) = battery_out_of_range(battery, motor)?;
    Some(format!(
        "Battery is {b} but motors are rated for {m}. Motors may not perform correctly."
    ))
}

fn vtx_camera_system(vtx: &Component, camera: &Component) -> Option<String> {
    let (v, c) = mismatch(vtx, camera, "system")?;
    Some(format!(
        "VTX is {v} but camera is {c}. They must use the same video system: a {v} VTX needs a {v} camera."
    ))
}

fn vtx_goggles_system(vtx: &Component, goggles: &Component) -> Option<String> {
    let (v, g) = mismatch(vtx, goggles, "system")?;
    Some(format!(
        "VTX is {v} but goggles are {g}. You won't get video! VTX and goggles must match."
    ))
}

fn camera_goggles_system(camera: &Component, goggles: &Component) -> Option<String> {
    let (c, g) = mismatch(camera, goggles, "system")?;
    Some(format!(
        "Camera is {c} but goggles are {g}. The entire video chain (Camera → VTX → Goggles) must use the same system."
    ))
}

fn rx_tx_protocol(rx: &Component, tx: &Component) -> Option<String> {
    let (r, t) = mismatch(rx, tx, "protocol")?;
    Some(format!(
        "Receiver is {r} but transmitter is {t}. They can't communicate; both must use the same protocol (e.g. both ELRS or both Crossfire)."
    ))
}

fn esc_fc_protocol(esc: &Component, fc: &Component) -> Option<String> {
    let esc_p = esc.spec_list("protocol");
    let fc_p = fc.spec_list("protocol");
    if esc_p.is_empty() || fc_p.is_empty() {
        return None;
    }
    if esc_p.iter().any(|p| fc_p.contains(p)) {
        return None;
    }
    Some(format!(
        "ESC supports {} but FC supports {}. No shared motor protocol; ESC may not respond to FC commands.",
        esc_p.join("/"),
        fc_p.join("/")
    ))
}

fn esc_fc_mount(esc: &Component, fc: &Component) -> Option<String> {
    let (e, f) = mismatch(esc, fc, "mountPattern")?;
    Some(format!(
        "ESC mount is {e}mm but FC is {f}mm. They won't stack together neatly."
    ))
}

fn battery_frame_size(battery: &Component, frame: &Component) -> Option<String> {
    let frame_size = frame.spec_text("size")?;
    let connector = battery.spec_text("connector")?;
    match (frame_size.as_str(), connector.as_str()) {
        ("3", "XT60") => Some(
            "XT60 batteries are quite large for a 3\" build. Consider an XT30 connector battery for better fit and less weight."
                .to_string(),
        ),
        ("5" | "7", "XT30") => Some(format!(
            "XT30 batteries are typically underpowered for {frame_size}\" builds. Most {frame_size}\" quads use XT60 connector batteries."
        )),
        _ => None,
    }
}

fn motor_esc_current(motor: &Component, esc: &Component) -> Option<String> {
    let motor_size = motor.spec_text("size")?;
    let amps = esc.spec_number("current")?;
    let stator = leading_int(&motor_size)?;
    if stator >= 2205 && amps < 30.0 {
        return Some(format!(
            "Motors ({motor_size}) are full-size but ESC is only {amps}A per motor. Consider 35A+ for safety margin."
        ));
    }
    None
}

fn fc_esc_aio(fc: &Component, esc: &Component) -> Option<String> {
    if fc.spec_flag("aio") && !esc.aio_virtual {
        return Some(
            "Your AIO FC already includes an ESC. The standalone ESC is redundant unless you need higher current."
                .to_string(),
        );
    }
    None
}

fn vtx_antenna_connector(vtx: &Component, antenna: &Component) -> Option<String> {
    let (v, a) = mismatch(vtx, antenna, "connector")?;
    let sma_family = ["SMA", "RP-SMA"];
    if sma_family.contains(&v.as_str()) && sma_family.contains(&a.as_str()) {
        return Some(format!(
            "VTX has {v} but VTX antenna is {a}. You'll need a simple SMA↔RP-SMA adapter: cheap and minimal signal loss."
        ));
    }
    Some(format!(
        "VTX has {v} but VTX antenna is {a}. You'll need a {v}↔{a} adapter pigtail, which adds weight and signal loss."
    ))
}

/// "868/915MHz" -> {"868", "915MHz"}; whitespace is dropped.
fn frequency_bands(spec: &str) -> BTreeSet<String> {
    spec.split('/')
        .map(|band| band.chars().filter(|c| !c.is_whitespace()).collect())
        .collect()
}

fn rx_antenna_frequency(rx: &Component, antenna: &Component) -> Option<String> {
    let rx_freq = rx.spec_text("frequency")?;
    let ant_freq = antenna.spec_text("frequency")?;
    let rx_bands = frequency_bands(&rx_freq);
    let ant_bands = frequency_bands(&ant_freq);
    if !rx_bands.is_disjoint(&ant_bands) {
        return None;
    }
    Some(format!(
        "Receiver operates on {rx_freq} but RX antenna is {ant_freq}. The antenna must match the receiver's frequency band."
    ))
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

static RULES: [CompatibilityRule; 19] = [
    CompatibilityRule {
        id: "frame-prop-size",
        name: "Frame ↔ Prop Size",
        description: "Frame size must match propeller size. A 5\" frame fits 5\" props, 3\" frame fits 3\" props, etc.",
        explanation: "Propellers must physically fit within the frame arms. Frame sizes (3\", 5\", 7\") define the maximum propeller diameter.",
        categories: (Category::Frame, Category::Propellers),
        severity: Severity::Error,
        check: frame_prop_size,
    },
    CompatibilityRule {
        id: "motor-prop-shaft",
        name: "Motor ↔ Prop Shaft",
        description: "Motor shaft diameter must match prop mounting hole. Most 5\" use M5 shafts, 3\" use M2 or T-mount.",
        explanation: "The propeller center hole must match the motor shaft. M5 (5mm) is standard for 5\"+ quads, M2 (2mm) for tiny whoops and 3\" builds.",
        categories: (Category::Motors, Category::Propellers),
        severity: Severity::Error,
        check: motor_prop_shaft,
    },
    CompatibilityRule {
        id: "motor-frame-size",
        name: "Motor ↔ Frame Size",
        description: "Motor stator size should match frame size class. 5\" frames typically use 2205-2307 motors, 3\" use 1303-1507, 7\" use 2806+.",
        explanation: "Larger frames carry heavier loads and need larger motors for enough thrust. The wrong motor size causes poor performance or worse.",
        categories: (Category::Motors, Category::Frame),
        severity: Severity::Warning,
        check: motor_frame_size,
    },
    CompatibilityRule {
        id: "fc-frame-mount",
        name: "FC ↔ Frame Mount Pattern",
        description: "Flight controller mounting holes must match the frame. Standard sizes: 30.5x30.5mm (5\"+) or 25.5x25.5mm (3\"/mini).",
        explanation: "Flight controllers mount to the frame via standard hole patterns. The two common sizes are 30.5x30.5mm (full-size, 5\"+) and 25.5x25.5mm (mini, 3\").",
        categories: (Category::Fc, Category::Frame),
        severity: Severity::Error,
        check: fc_frame_mount,
    },
    CompatibilityRule {
        id: "esc-frame-mount",
        name: "ESC ↔ Frame Mount Pattern",
        description: "ESC mounting holes must match the frame stack. Typically same as FC mount pattern.",
        explanation: "ESCs stack under or over the flight controller using the same mounting pattern as the frame.",
        categories: (Category::Esc, Category::Frame),
        severity: Severity::Error,
        check: esc_frame_mount,
    },
    CompatibilityRule {
        id: "battery-esc-voltage",
        name: "Battery ↔ ESC Voltage",
        description: "Battery cell count must be within the ESC voltage rating. Exceeding it can destroy the ESC.",
        explanation: "LiPo batteries are rated in cell count (S). Each cell is ~3.7V. A battery with more cells than the ESC supports will fry the ESC.",
        categories: (Category::Battery, Category::Esc),
        severity: Severity::Error,
        check: battery_esc_voltage,
    },
    CompatibilityRule {
        id: "battery-fc-voltage",
        name: "Battery ↔ FC Voltage",
        description: "Battery cell count must be within the FC voltage rating. Too many cells can fry the FC.",
        explanation: "Like the ESC, the flight controller has a maximum voltage. Exceeding it destroys the FC.",
        categories: (Category::Battery, Category::Fc),
        severity: Severity::Error,
        check: battery_fc_voltage,
    },
    CompatibilityRule {
        id: "battery-motor-voltage",
        name: "Battery ↔ Motor Voltage",
        description: "Battery cell count should be within motor voltage rating. Running motors outside rated voltage affects performance and lifespan.",
        explanation: "Motors have a recommended voltage range. Too low means not enough power; too high means overheating and reduced lifespan.",
        categories: (Category::Battery, Category::Motors),
        severity: Severity::Warning,
        check: battery_motor_voltage,
    },
    CompatibilityRule {
        id: "vtx-camera-system",
        name: "VTX ↔ Camera System",
        description: "VTX and camera must use the same video system (Analog, DJI, HDZero, or Walksnail). They are not cross-compatible.",
        explanation: "FPV video systems (Analog, DJI, HDZero, Walksnail) are closed ecosystems. The camera, VTX, and goggles must all be the same system.",
        categories: (Category::Vtx, Category::Camera),
        severity: Severity::Error,
        check: vtx_camera_system,
    },
    CompatibilityRule {
        id: "vtx-goggles-system",
        name: "VTX ↔ Goggles System",
        description: "VTX and goggles must use the same video system. DJI VTX to DJI Goggles, Analog VTX to Analog Goggles, etc.",
        explanation: "Your goggles receive the video signal from the VTX. Different systems use incompatible transmission methods.",
        categories: (Category::Vtx, Category::Goggles),
        severity: Severity::Error,
        check: vtx_goggles_system,
    },
    CompatibilityRule {
        id: "camera-goggles-system",
        name: "Camera ↔ Goggles System",
        description: "Camera and goggles must use the same video system for the whole video chain to work.",
        explanation: "The camera feeds into the VTX which transmits to goggles. All three must match.",
        categories: (Category::Camera, Category::Goggles),
        severity: Severity::Error,
        check: camera_goggles_system,
    },
    CompatibilityRule {
        id: "rx-tx-protocol",
        name: "RX ↔ TX Protocol",
        description: "Receiver and transmitter must use the same radio protocol (ELRS, Crossfire, FrSky, FlySky). They cannot communicate otherwise.",
        explanation: "Your transmitter talks to the receiver on the quad via a specific radio protocol. Both must use the same protocol (ELRS, Crossfire, FrSky, etc.).",
        categories: (Category::Rx, Category::Tx),
        severity: Severity::Error,
        check: rx_tx_protocol,
    },
    CompatibilityRule {
        id: "esc-fc-protocol",
        name: "ESC ↔ FC Protocol",
        description: "ESC and FC must share at least one compatible motor protocol (DShot600, DShot300, etc.).",
        explanation: "The FC tells the ESC how fast to spin each motor using a digital protocol like DShot. Both must support at least one common protocol.",
        categories: (Category::Esc, Category::Fc),
        severity: Severity::Warning,
        check: esc_fc_protocol,
    },
    CompatibilityRule {
        id: "esc-fc-mount",
        name: "ESC ↔ FC Stack Mount",
        description: "ESC and FC should have the same mount pattern so they stack together cleanly.",
        explanation: "The ESC and FC are typically stacked together. Matching mount patterns make assembly much easier.",
        categories: (Category::Esc, Category::Fc),
        severity: Severity::Warning,
        check: esc_fc_mount,
    },
    CompatibilityRule {
        id: "battery-frame-size",
        name: "Battery ↔ Frame Size",
        description: "Small batteries (XT30/3-4S low capacity) suit 3\" builds; larger batteries (XT60/5-6S) suit 5\"+ builds.",
        explanation: "Small frames need small, light batteries. Large frames need powerful batteries for adequate flight time.",
        categories: (Category::Battery, Category::Frame),
        severity: Severity::Info,
        check: battery_frame_size,
    },
    CompatibilityRule {
        id: "motor-esc-current",
        name: "Motor ↔ ESC Current",
        description: "ESC per-motor current rating should handle the motors. Rule of thumb: ESC should handle more than the motor peak draw.",
        explanation: "The ESC current rating must exceed the motor's peak current draw. Underpowered ESCs can overheat and fail mid-flight.",
        categories: (Category::Motors, Category::Esc),
        severity: Severity::Info,
        check: motor_esc_current,
    },
    CompatibilityRule {
        id: "fc-esc-aio",
        name: "AIO FC ↔ Standalone ESC",
        description: "AIO flight controllers include an integrated ESC. Adding a standalone ESC is usually redundant.",
        explanation: "AIO (All-in-One) flight controllers have the ESC built onto the same board. A separate standalone ESC is redundant unless you need more current than the integrated one provides.",
        categories: (Category::Fc, Category::Esc),
        severity: Severity::Warning,
        check: fc_esc_aio,
    },
    CompatibilityRule {
        id: "vtx-vtxAntenna-connector",
        name: "VTX ↔ VTX Antenna Connector",
        description: "VTX and VTX antenna RF connectors must match (SMA, MMCX, UFL, RP-SMA). Mismatched connectors need adapters that add weight and signal loss.",
        explanation: "VTX and antenna connect via an RF connector. Common types are SMA, RP-SMA, MMCX, and UFL. Mismatches need adapter pigtails that add weight, bulk, and signal loss. SMA↔RP-SMA adapters are simple screw-on parts with minimal loss.",
        categories: (Category::Vtx, Category::VtxAntenna),
        severity: Severity::Warning,
        check: vtx_antenna_connector,
    },
    CompatibilityRule {
        id: "rx-rxAntenna-frequency",
        name: "RX ↔ RX Antenna Frequency",
        description: "Receiver and RX antenna must operate on the same frequency band (2.4GHz, 900MHz, 868MHz). Mismatched frequencies mean no signal.",
        explanation: "The receiver antenna must operate on the receiver's frequency band. ELRS 2.4GHz receivers need a 2.4GHz antenna, 900MHz receivers a 900MHz antenna, Crossfire uses 868MHz. The wrong band means no signal reception.",
        categories: (Category::Rx, Category::RxAntenna),
        severity: Severity::Error,
        check: rx_antenna_frequency,
    },
];
