//! Physical placement laws
//!
//! Decides whether an object may be dropped onto another one (or onto an
//! empty column). The transition graph only generates drops that pass
//! [`can_support`], so every reachable snapshot is physically valid.

use crate::logic::{Form, ObjectSpec, Relation, Size};

/// Whether `held` may rest on `support` (`None` = the floor).
pub fn can_support(held: &ObjectSpec, support: Option<&ObjectSpec>) -> bool {
    let support = match support {
        Some(s) => s,
        None => return true,
    };

    // Balls support nothing
    if support.form == Form::Ball {
        return false;
    }
    // Small objects cannot support large objects
    if held.size == Size::Large && support.size == Size::Small {
        return false;
    }
    // Balls must be in boxes or on the floor
    if held.form == Form::Ball && support.form != Form::Box {
        return false;
    }
    // Boxes cannot contain pyramids, planks or boxes of the same size
    if support.form == Form::Box
        && matches!(held.form, Form::Pyramid | Form::Plank | Form::Box)
        && held.size == support.size
    {
        return false;
    }
    if held.form == Form::Box {
        // Small boxes cannot be supported by small bricks or pyramids
        if held.size == Size::Small
            && ((support.form == Form::Brick && support.size == Size::Small)
                || support.form == Form::Pyramid)
        {
            return false;
        }
        // Large boxes cannot be supported by large pyramids
        if held.size == Size::Large && support.form == Form::Pyramid && support.size == Size::Large
        {
            return false;
        }
    }
    true
}

/// The relation a placement onto `support` establishes: "inside" for boxes,
/// "ontop" for everything else.
pub fn placement_relation(support: Option<&ObjectSpec>) -> Relation {
    match support {
        Some(s) if s.form == Form::Box => Relation::Inside,
        _ => Relation::OnTop,
    }
}
