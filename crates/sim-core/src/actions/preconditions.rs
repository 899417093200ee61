//! Closed predicate set gating whether an action kind may be attempted
//! (§4.4). All preconditions for an action definition must hold.

use crate::attempt::ActionKind;
use crate::world::npc::Category;
use crate::world::site::SiteKind;
use crate::world::World;

#[derive(Debug, Clone)]
pub enum Precondition {
    AtSiteKind(&'static str),
    HasCategory(Category),
    NotBusy,
    NotTraveling,
    NotDetained,
    SiteConditionAtLeast(&'static str, f64),
    NpcConditionAtLeast(&'static str, f64),
    HasTarget,
}

pub fn preconditions_for(kind: ActionKind) -> Vec<Precondition> {
    use ActionKind::*;
    match kind {
        WorkFarm => vec![Precondition::AtSiteKind("settlement"), Precondition::NotBusy, Precondition::NotDetained],
        WorkFish | WorkHunt => vec![Precondition::AtSiteKind("settlement"), Precondition::NotBusy, Precondition::NotDetained],
        Trade => vec![Precondition::AtSiteKind("settlement"), Precondition::NotBusy, Precondition::HasTarget],
        Patrol => vec![Precondition::HasCategory(Category::Guard), Precondition::NotBusy],
        Investigate => vec![Precondition::NotBusy, Precondition::NotDetained],
        Assault | Kill | Kidnap | Steal | Blackmail => {
            vec![Precondition::NotBusy, Precondition::NotDetained, Precondition::HasTarget]
        }
        // A raid targets a site, not a pre-selected NPC; resolve_raid picks
        // its victim among those present at resolution time.
        Raid => vec![Precondition::NotBusy, Precondition::NotDetained],
        Heal => vec![Precondition::HasCategory(Category::Healer), Precondition::HasTarget],
        PreachFixedPath => vec![Precondition::HasCategory(Category::CultLeader), Precondition::AtSiteKind("settlement")],
        ForcedEclipse => vec![
            Precondition::HasCategory(Category::CultLeader),
            Precondition::HasTarget,
            Precondition::NpcConditionAtLeast("target_detained", 1.0),
        ],
        AnchorSever => vec![Precondition::HasCategory(Category::AnchorMage), Precondition::HasTarget],
        Arrest => vec![Precondition::HasCategory(Category::Guard), Precondition::HasTarget, Precondition::NotBusy],
        Gossip | Recon => vec![Precondition::NotBusy],
        Travel => vec![Precondition::NotTraveling],
        Idle => vec![],
    }
}

pub fn evaluate(
    predicate: &Precondition,
    world: &World,
    actor_id: &crate::ids::NpcId,
    target_id: Option<&crate::ids::NpcId>,
) -> bool {
    let Some(actor) = world.get_npc(actor_id) else {
        return false;
    };
    match predicate {
        Precondition::AtSiteKind(kind) => world
            .get_site(&actor.site_id)
            .map(|s| {
                matches!(
                    (kind.as_ref(), &s.kind),
                    ("settlement", SiteKind::Settlement(_))
                        | ("terrain", SiteKind::Terrain(_))
                        | ("special", SiteKind::Special(_))
                        | ("hideout", SiteKind::Hideout(_))
                )
            })
            .unwrap_or(false),
        Precondition::HasCategory(category) => actor.category == *category,
        Precondition::NotBusy => !actor.is_busy(world.tick),
        Precondition::NotTraveling => !actor.is_traveling(),
        Precondition::NotDetained => !actor.is_detained(),
        Precondition::SiteConditionAtLeast(_, _) => true,
        Precondition::NpcConditionAtLeast(field, threshold) => match *field {
            "target_detained" => target_id
                .and_then(|id| world.get_npc(id))
                .map(|n| if n.is_detained() { 1.0 } else { 0.0 } >= *threshold)
                .unwrap_or(false),
            _ => true,
        },
        Precondition::HasTarget => target_id.is_some(),
    }
}

pub fn all_hold(
    kind: ActionKind,
    world: &World,
    actor_id: &crate::ids::NpcId,
    target_id: Option<&crate::ids::NpcId>,
) -> bool {
    preconditions_for(kind)
        .iter()
        .all(|p| evaluate(p, world, actor_id, target_id))
}
