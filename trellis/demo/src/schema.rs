//! Schema traits. Generated adapters are included at the bottom.

use std::collections::HashSet;

use trellis::{FramedEdge, FramedVertex, edge, vertex};

#[vertex]
pub trait Person: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);
    fn get_age(&self) -> i32;
    fn set_age(&self, age: i32);
    fn get_active(&self) -> bool;
    fn set_active(&self, active: bool);

    #[property(hidden)]
    fn get_acl(&self) -> String;
    #[property(hidden)]
    fn set_acl(&self, acl: &str);

    #[linked_vertex(label = "knows")]
    fn get_knows_people(&self) -> Vec<Box<dyn Person>>;

    #[linked_vertex(label = "knows", direction = In)]
    fn get_known_by(&self) -> Box<[Box<dyn Person>]>;

    fn get_friends(&self) -> HashSet<Box<dyn Person>>;
    fn add_friend(&self, friend: &dyn Person);

    fn get_colleagues(&self) -> Box<dyn Iterator<Item = Box<dyn Person>>>;
    fn add_colleague(&self, colleague: Box<dyn Person>);

    fn get_knows(&self) -> Vec<Box<dyn Knows>>;

    #[linked_vertex(label = "created")]
    fn get_software(&self) -> Vec<Box<dyn Software>>;
    fn add_created(&self, software: &dyn Software);

    #[inbound]
    fn get_mentor(&self) -> Option<Box<dyn Person>>;

    fn get_knows_person(&self, person: &dyn Person) -> bool;
    fn get_visits(&self) -> usize;

    fn describe(&self) -> String {
        format!("{} ({})", self.get_name().unwrap_or_default(), self.get_age())
    }
}

#[vertex(label = "software")]
pub trait Software: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);

    #[linked_vertex(label = "created", direction = In)]
    fn get_creators(&self) -> Vec<Box<dyn Person>>;
}

#[edge]
pub trait Knows: FramedEdge {
    fn get_weight(&self) -> f64;
    fn set_weight(&self, weight: f64);
    fn get_source(&self) -> Box<dyn Person>;

    #[inbound]
    fn get_target(&self) -> Box<dyn Person>;
}

#[vertex]
pub trait Employee: Person {
    fn get_salary(&self) -> Option<f64>;
    fn set_salary(&self, salary: Option<f64>);
}

include!(concat!(env!("OUT_DIR"), "/trellis/adapters.rs"));
