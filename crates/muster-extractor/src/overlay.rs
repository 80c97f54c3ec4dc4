//! Overlay merging
//!
//! Overlays are hand-authored patches applied in the order given. The
//! append-versus-merge decision is made once per overlay faction.

use muster_domain::{BattleProfileData, Overlay};
use tracing::info;

/// Apply `overlays` to `data` in order; later overlays win on name
/// collisions
pub fn merge_overlays(mut data: BattleProfileData, overlays: &[Overlay]) -> BattleProfileData {
    for overlay in overlays {
        for overlay_faction in &overlay.factions {
            let Some(index) = data
                .factions
                .iter()
                .position(|f| f.name == overlay_faction.name)
            else {
                info!("Overlay adds faction {}", overlay_faction.name);
                data.factions.push(overlay_faction.clone().into());
                continue;
            };

            let faction = &mut data.factions[index];
            for profile in &overlay_faction.battle_profiles {
                match faction
                    .battle_profiles
                    .iter_mut()
                    .find(|p| p.name == profile.name)
                {
                    Some(existing) => {
                        info!("Overlay replaces {} in {}", profile.name, faction.name);
                        *existing = profile.clone();
                    }
                    None => {
                        info!("Overlay appends {} to {}", profile.name, faction.name);
                        faction.battle_profiles.push(profile.clone());
                    }
                }
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_domain::{Faction, OverlayFaction, UnitProfile};

    fn unit(name: &str, points: i64) -> UnitProfile {
        UnitProfile {
            points,
            unit_size: "1".to_string(),
            ..UnitProfile::new(name)
        }
    }

    fn data() -> BattleProfileData {
        BattleProfileData {
            factions: vec![Faction {
                name: "Stormcast Eternals".to_string(),
                battle_profiles: vec![unit("Lord-Celestant", 120), unit("Liberators", 110)],
                other: Vec::new(),
            }],
            ..BattleProfileData::default()
        }
    }

    fn overlay(faction: &str, profiles: Vec<UnitProfile>) -> Overlay {
        Overlay {
            factions: vec![OverlayFaction {
                name: faction.to_string(),
                battle_profiles: profiles,
                other: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_no_overlays_is_identity() {
        assert_eq!(merge_overlays(data(), &[]), data());
    }

    #[test]
    fn test_replace_and_append() {
        let merged = merge_overlays(
            data(),
            &[overlay(
                "Stormcast Eternals",
                vec![unit("Liberators", 130), unit("Lord-Veritant", 140)],
            )],
        );
        let profiles = &merged.factions[0].battle_profiles;

        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[1].points, 130);
        assert_eq!(profiles[2].name, "Lord-Veritant");
    }

    #[test]
    fn test_new_faction_appended_once() {
        let merged = merge_overlays(
            data(),
            &[overlay(
                "Kruleboyz",
                vec![unit("Gutrippaz", 150), unit("Breaka-boss", 110)],
            )],
        );

        assert_eq!(merged.factions.len(), 2);
        assert_eq!(merged.factions[1].name, "Kruleboyz");
        assert_eq!(merged.factions[1].battle_profiles.len(), 2);
    }

    #[test]
    fn test_every_overlay_faction_processed() {
        let mut patch = overlay("Kruleboyz", vec![unit("Gutrippaz", 150)]);
        patch.factions.push(OverlayFaction {
            name: "Stormcast Eternals".to_string(),
            battle_profiles: vec![unit("Lord-Celestant", 125)],
            other: Vec::new(),
        });
        let merged = merge_overlays(data(), &[patch]);

        assert_eq!(merged.factions.len(), 2);
        assert_eq!(merged.factions[0].battle_profiles[0].points, 125);
    }

    #[test]
    fn test_later_overlay_wins() {
        let merged = merge_overlays(
            data(),
            &[
                overlay("Stormcast Eternals", vec![unit("Liberators", 130)]),
                overlay("Stormcast Eternals", vec![unit("Liberators", 150)]),
            ],
        );
        assert_eq!(merged.factions[0].battle_profiles[1].points, 150);
    }
}
