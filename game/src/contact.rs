//! Contact resolution: what a collision between two tagged bodies means.
//!
//! Classification only. Applying the outcome to meter, score and game state
//! is the session's job, and only happens while playing.

use glam::Vec2;
use stoop_engine::physics::Body;
use stoop_engine::BodyId;

use crate::level::EntityTag;

/// Snapshot of one side of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBody {
    pub id: BodyId,
    pub tag: EntityTag,
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
}

impl From<Body<EntityTag>> for ContactBody {
    fn from(body: Body<EntityTag>) -> Self {
        Self {
            id: body.id,
            tag: body.tag,
            position: body.position,
            size: body.size,
            velocity: body.velocity,
        }
    }
}

/// An unordered pair of bodies that just started touching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl From<stoop_engine::Contact<EntityTag>> for Contact {
    fn from(contact: stoop_engine::Contact<EntityTag>) -> Self {
        Self {
            a: contact.a.into(),
            b: contact.b.into(),
        }
    }
}

impl Contact {
    /// Returns `(player, other)` if this contact pairs the player with a
    /// body tagged `tag`, in either order.
    fn player_with(&self, tag: EntityTag) -> Option<(&ContactBody, &ContactBody)> {
        if self.a.tag == EntityTag::Player && self.b.tag == tag {
            Some((&self.a, &self.b))
        } else if self.b.tag == EntityTag::Player && self.a.tag == tag {
            Some((&self.b, &self.a))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Pickup: remove the item, refill the meter.
    Collected { item: BodyId },
    /// Enemy defeated from above: remove it, add points.
    Stomped { enemy: BodyId },
    /// Enemy touched any other way: the run ends.
    Hit { enemy: BodyId },
    ReachedGoal,
    Ignored,
}

/// Both conditions are strict: the player must be more than
/// `height_ratio * enemy height` above the enemy's center and moving down.
pub fn is_stomp(player: &ContactBody, enemy: &ContactBody, height_ratio: f32) -> bool {
    let above = player.position.y > enemy.position.y + enemy.size.y * height_ratio;
    let descending = player.velocity.y < 0.0;
    above && descending
}

pub fn resolve(contact: &Contact, stomp_height_ratio: f32) -> ContactOutcome {
    if let Some((_, item)) = contact.player_with(EntityTag::Collectible) {
        return ContactOutcome::Collected { item: item.id };
    }
    if let Some((player, enemy)) = contact.player_with(EntityTag::Enemy) {
        return if is_stomp(player, enemy, stomp_height_ratio) {
            ContactOutcome::Stomped { enemy: enemy.id }
        } else {
            ContactOutcome::Hit { enemy: enemy.id }
        };
    }
    if contact.player_with(EntityTag::Goal).is_some() {
        return ContactOutcome::ReachedGoal;
    }
    ContactOutcome::Ignored
}
