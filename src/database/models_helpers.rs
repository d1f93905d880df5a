use super::models::{Dealership, User, Vehicle};
use super::schema::{app_user, dealership, vehicle};
use diesel::dsl::{AsSelect, Eq, Filter, Select};
use diesel::pg::Pg;
use diesel::prelude::*;

type VehicleAll = Select<vehicle::table, AsSelect<Vehicle, Pg>>;
type UserAll = Select<app_user::table, AsSelect<User, Pg>>;
type DealershipAll = Select<dealership::table, AsSelect<Dealership, Pg>>;

// https://diesel.rs/guides/composing-applications.html
impl Vehicle {
    pub fn all() -> VehicleAll {
        vehicle::table.select(Vehicle::as_select())
    }
}

impl User {
    pub fn all() -> UserAll {
        app_user::table.select(User::as_select())
    }

    pub fn by_username(
        username: &str,
    ) -> Filter<UserAll, Eq<app_user::username, &str>> {
        Self::all().filter(app_user::username.eq(username))
    }
}

impl Dealership {
    pub fn all() -> DealershipAll {
        dealership::table.select(Dealership::as_select())
    }

    pub fn by_slug(slug: &str) -> Filter<DealershipAll, Eq<dealership::slug, &str>> {
        Self::all().filter(dealership::slug.eq(slug))
    }
}
