//! Fixed photo slots of an order gallery

/// Number of addressable photo slots per order
pub const SLOT_COUNT: usize = 10;

/// Semantic labels per slot number. Slot 4 has never had one.
const SLOT_LABELS: [(u8, &str); 9] = [
	(1, "Frente"),
	(2, "Trasera"),
	(3, "Lateral izquierdo"),
	(5, "Lateral derecho"),
	(6, "Cofre"),
	(7, "Techo"),
	(8, "Interior delantero"),
	(9, "Interior trasero"),
	(10, "Tablero"),
];

/// Iterator over valid slot numbers, 1 through 10
pub fn slots() -> impl Iterator<Item = u8> {
	1..=SLOT_COUNT as u8
}

pub fn is_valid_slot(slot: i32) -> bool {
	(1..=SLOT_COUNT as i32).contains(&slot)
}

/// Semantic label of a slot, if it has one
pub fn semantic_label(slot: u8) -> Option<&'static str> {
	SLOT_LABELS
		.iter()
		.find(|(number, _)| *number == slot)
		.map(|(_, label)| *label)
}

/// Display label of a slot; unlabeled slots render as "Foto N"
pub fn slot_label(slot: u8) -> String {
	semantic_label(slot).map_or_else(|| format!("Foto {slot}"), str::to_string)
}

/// Submitted form field name for a slot
pub fn field_name(slot: u8) -> String {
	format!("foto_{slot}")
}
