//! Pure tag composition for snapshots

use crate::provider::{tag_value, Image, Tag};

pub const NAME_TAG: &str = "Name";
/// Where an instance name goes when the snapshot already has a Name
pub const INSTANCE_NAME_TAG: &str = "instance_name";
pub const AMI_IMAGE_ID_TAG: &str = "ami_image_id";
pub const AMI_DESCRIPTION_TAG: &str = "ami_description";
pub const AMI_IMAGE_LOCATION_TAG: &str = "ami_image_location";

const CREATE_IMAGE_PREFIX: &str = "Created by CreateImage(";
const AMI_NAME_PREFIX: &str = "copied from AMI: ";

pub fn has_name_tag(tags: &[Tag]) -> bool {
    tag_value(tags, NAME_TAG).is_some()
}

/// Instance ID from an EC2-generated snapshot description.
///
/// `"Created by CreateImage(i-0abc) for ami-0def from vol-0123"` yields
/// `Some("i-0abc")`.
pub fn instance_id_from_description(description: &str) -> Option<&str> {
    let rest = description.strip_prefix(CREATE_IMAGE_PREFIX)?;
    let id = rest.split(')').next()?.trim();
    (!id.is_empty()).then_some(id)
}

/// Tag carrying the originating instance's name. An existing Name is never
/// overwritten.
pub fn compose_instance_name_tag(existing: &[Tag], instance_name: &str) -> Tag {
    let key = if has_name_tag(existing) {
        INSTANCE_NAME_TAG
    } else {
        NAME_TAG
    };
    (key.to_string(), instance_name.to_string())
}

/// AMI metadata tags, plus a synthesized Name when the snapshot has none
pub fn compose_ami_tags(existing: &[Tag], image: &Image) -> Vec<Tag> {
    let mut tags = vec![
        (AMI_IMAGE_ID_TAG.to_string(), image.image_id.clone()),
        (AMI_DESCRIPTION_TAG.to_string(), image.description.clone()),
        (AMI_IMAGE_LOCATION_TAG.to_string(), image.image_location.clone()),
    ];

    if !has_name_tag(existing) {
        let source = if image.description.is_empty() {
            &image.image_location
        } else {
            &image.description
        };
        tags.push((NAME_TAG.to_string(), format!("{}{}", AMI_NAME_PREFIX, source)));
    }

    tags
}

/// Upsert `updates` into `tags` by key
pub fn merge_tags(tags: &mut Vec<Tag>, updates: &[Tag]) {
    for (key, value) in updates {
        match tags.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.clone(),
            None => tags.push((key.clone(), value.clone())),
        }
    }
}
