//! Test: a vertex schema using every accessor marker compiles.

use trellis::{FramedVertex, vertex};

#[vertex(label = "human")]
pub trait Person: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);

    #[property(hidden)]
    fn get_acl(&self) -> String;

    #[linked_vertex(label = "knows", direction = Out)]
    fn get_knows_people(&self) -> Vec<Box<dyn Person>>;

    #[inbound]
    fn get_mentor(&self) -> Option<Box<dyn Person>>;

    fn add_friend(&self, friend: &dyn Person);

    fn describe(&self) -> String {
        format!("{self}")
    }
}

fn main() {}
