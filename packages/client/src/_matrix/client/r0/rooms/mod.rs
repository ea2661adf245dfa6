pub mod by_room_id;
