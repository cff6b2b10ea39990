//! Settings panel content.

use super::nodes::{LabelStyle, ToggleTarget, ViewNode};
use crate::settings::{DisplayUnits, SettingToggle, Settings};

/// Online manual explaining each setting.
pub const MANUAL_URL: &str = "https://github.com/HebaruSan/Astrogator/blob/master/README.md#settings";

const GENERAL: [SettingToggle; 4] = [
    SettingToggle::GeneratePlaneChangeBurns,
    SettingToggle::AddPlaneChangeDeltaV,
    SettingToggle::DeleteExistingManeuvers,
    SettingToggle::ShowTrackedAsteroids,
];

const MANEUVER_CREATION: [SettingToggle; 6] = [
    SettingToggle::AutoTargetDestination,
    SettingToggle::AutoFocusDestination,
    SettingToggle::AutoEditEjectionNode,
    SettingToggle::AutoEditPlaneChangeNode,
    SettingToggle::AutoSetSas,
    SettingToggle::TranslationAdjust,
];

/// Build the settings panel for `settings`.
pub fn settings_panel(settings: &Settings) -> ViewNode {
    let toggle = |t: SettingToggle| ViewNode::Toggle {
        target: ToggleTarget::Setting(t),
        label: t.label().to_string(),
        checked: settings.flag(t),
    };
    let units = |u: DisplayUnits, label: &str| ViewNode::Toggle {
        target: ToggleTarget::Units(u),
        label: label.to_string(),
        checked: settings.display_units == u,
    };

    let mut children = vec![
        ViewNode::Link {
            text: "Click for online manual".to_string(),
            url: MANUAL_URL.to_string(),
        },
        ViewNode::label("Settings:", LabelStyle::Heading),
    ];
    children.extend(GENERAL.into_iter().map(toggle));
    children.push(ViewNode::label("Maneuver creation:", LabelStyle::Heading));
    children.extend(MANEUVER_CREATION.into_iter().map(toggle));
    children.push(ViewNode::label("Units:", LabelStyle::Heading));
    children.push(units(
        DisplayUnits::Metric,
        "Système International d'Unités (Metric)",
    ));
    children.push(units(
        DisplayUnits::UnitedStatesCustomary,
        "United States Customary (Imperial)",
    ));

    ViewNode::Stack(children)
}

/// Toggles in the order they appear in the panel.
pub fn panel_toggles() -> impl Iterator<Item = SettingToggle> {
    GENERAL.into_iter().chain(MANEUVER_CREATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_toggle_appears_once() {
        let panel = settings_panel(&Settings::default());
        for t in SettingToggle::ALL {
            let n = panel
                .walk()
                .into_iter()
                .filter(|node| {
                    matches!(node, ViewNode::Toggle { target: ToggleTarget::Setting(x), .. } if *x == t)
                })
                .count();
            assert_eq!(n, 1, "{:?}", t);
        }
        assert_eq!(panel_toggles().count(), SettingToggle::ALL.len());
    }

    #[test]
    fn unit_radio_reflects_setting() {
        let mut settings = Settings::default();
        settings.display_units = DisplayUnits::UnitedStatesCustomary;
        let checked: Vec<DisplayUnits> = settings_panel(&settings)
            .walk()
            .into_iter()
            .filter_map(|node| match node {
                ViewNode::Toggle {
                    target: ToggleTarget::Units(u),
                    checked: true,
                    ..
                } => Some(*u),
                _ => None,
            })
            .collect();
        assert_eq!(checked, vec![DisplayUnits::UnitedStatesCustomary]);
    }
}
