//! Event schema registry and decoder.
//!
//! Every event the bridge understands is a variant of `EventSchema`, keyed
//! by the contract that emits it. Decoding is exact: the entry must carry the
//! schema's topics and a payload that re-encodes to the same bytes, otherwise
//! a `DecodeError` naming the schema and the emitting address is returned.

use crate::abi::{IArbFactory::RollupCreated, IChallenge::InitiatedChallenge};
use alloy::sol_types::SolEvent;
use bridge_types::{Address, DecodeError, LogEntry, TimeTicks, B256, U256};
use std::fmt;

/// Contracts whose events are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
	ArbFactory,
	Challenge,
}

/// Known event schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSchema {
	/// `RollupCreated(address vmAddress)` from the rollup factory.
	RollupCreated,
	/// `InitiatedChallenge(uint128 deadlineTicks)` from a new challenge.
	InitiatedChallenge,
}

impl EventSchema {
	pub const ALL: [EventSchema; 2] = [EventSchema::RollupCreated, EventSchema::InitiatedChallenge];

	/// Finds the schema `contract` registers under `name`.
	pub fn lookup(contract: ContractKind, name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|schema| schema.contract() == contract && schema.name() == name)
	}

	pub fn name(&self) -> &'static str {
		match self {
			EventSchema::RollupCreated => "RollupCreated",
			EventSchema::InitiatedChallenge => "InitiatedChallenge",
		}
	}

	pub fn contract(&self) -> ContractKind {
		match self {
			EventSchema::RollupCreated => ContractKind::ArbFactory,
			EventSchema::InitiatedChallenge => ContractKind::Challenge,
		}
	}

	/// Canonical Solidity signature.
	pub fn signature(&self) -> &'static str {
		match self {
			EventSchema::RollupCreated => RollupCreated::SIGNATURE,
			EventSchema::InitiatedChallenge => InitiatedChallenge::SIGNATURE,
		}
	}

	/// The topic0 value entries of this schema carry.
	pub fn signature_hash(&self) -> B256 {
		match self {
			EventSchema::RollupCreated => RollupCreated::SIGNATURE_HASH,
			EventSchema::InitiatedChallenge => InitiatedChallenge::SIGNATURE_HASH,
		}
	}
}

impl fmt::Display for EventSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.signature())
	}
}

/// Typed projection of a log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
	RollupCreated { vm_address: Address },
	InitiatedChallenge { deadline: TimeTicks },
}

impl DecodedEvent {
	pub fn schema(&self) -> EventSchema {
		match self {
			DecodedEvent::RollupCreated { .. } => EventSchema::RollupCreated,
			DecodedEvent::InitiatedChallenge { .. } => EventSchema::InitiatedChallenge,
		}
	}
}

/// Decodes `entry` according to `schema`.
pub fn decode(schema: EventSchema, entry: &LogEntry) -> Result<DecodedEvent, DecodeError> {
	match schema {
		EventSchema::RollupCreated => {
			let event: RollupCreated = decode_exact(schema, entry)?;
			Ok(DecodedEvent::RollupCreated {
				vm_address: event.vmAddress,
			})
		}
		EventSchema::InitiatedChallenge => {
			let event: InitiatedChallenge = decode_exact(schema, entry)?;
			Ok(DecodedEvent::InitiatedChallenge {
				deadline: TimeTicks(U256::from(event.deadlineTicks)),
			})
		}
	}
}

fn decode_exact<E: SolEvent>(schema: EventSchema, entry: &LogEntry) -> Result<E, DecodeError> {
	let fail = |reason: String| DecodeError::new(schema.name(), entry.address, reason);

	match entry.signature() {
		Some(topic) if *topic == E::SIGNATURE_HASH => {}
		Some(topic) => return Err(fail(format!("unexpected signature topic {}", topic))),
		None => return Err(fail("entry has no topics".to_string())),
	}

	let event = E::decode_raw_log(entry.topics.iter().copied(), &entry.data)
		.map_err(|e| fail(e.to_string()))?;

	let topics: Vec<B256> = event.encode_topics().into_iter().map(|t| t.0).collect();
	if topics != entry.topics {
		return Err(fail(format!(
			"expected {} topics, entry has {}",
			topics.len(),
			entry.topics.len()
		)));
	}
	if event.encode_data() != entry.data.as_ref() {
		return Err(fail("payload is not canonically encoded".to_string()));
	}

	Ok(event)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::Bytes;

	fn rollup_created(vm: Address) -> LogEntry {
		let event = RollupCreated { vmAddress: vm };
		LogEntry::new(
			Address::repeat_byte(0xfa),
			vec![RollupCreated::SIGNATURE_HASH],
			Bytes::from(event.encode_data()),
		)
	}

	#[test]
	fn test_lookup() {
		assert_eq!(
			EventSchema::lookup(ContractKind::ArbFactory, "RollupCreated"),
			Some(EventSchema::RollupCreated)
		);
		assert_eq!(
			EventSchema::lookup(ContractKind::Challenge, "InitiatedChallenge"),
			Some(EventSchema::InitiatedChallenge)
		);
		assert_eq!(EventSchema::lookup(ContractKind::Challenge, "RollupCreated"), None);
		assert_eq!(EventSchema::lookup(ContractKind::ArbFactory, "Unknown"), None);
	}

	#[test]
	fn test_signatures() {
		assert_eq!(EventSchema::RollupCreated.signature(), "RollupCreated(address)");
		assert_eq!(
			EventSchema::InitiatedChallenge.to_string(),
			"InitiatedChallenge(uint128)"
		);
		assert_ne!(
			EventSchema::RollupCreated.signature_hash(),
			EventSchema::InitiatedChallenge.signature_hash()
		);
	}

	#[test]
	fn test_decode_rollup_created() {
		let vm = Address::repeat_byte(0x33);
		let decoded = decode(EventSchema::RollupCreated, &rollup_created(vm)).unwrap();
		assert_eq!(decoded, DecodedEvent::RollupCreated { vm_address: vm });
		assert_eq!(decoded.schema(), EventSchema::RollupCreated);
	}

	#[test]
	fn test_decode_initiated_challenge() {
		let event = InitiatedChallenge {
			deadlineTicks: 45_000,
		};
		let entry = LogEntry::new(
			Address::repeat_byte(0xcc),
			vec![InitiatedChallenge::SIGNATURE_HASH],
			Bytes::from(event.encode_data()),
		);
		let decoded = decode(EventSchema::InitiatedChallenge, &entry).unwrap();
		assert_eq!(
			decoded,
			DecodedEvent::InitiatedChallenge {
				deadline: TimeTicks(U256::from(45_000u64))
			}
		);
	}

	#[test]
	fn test_wrong_schema_is_rejected() {
		let entry = rollup_created(Address::repeat_byte(0x33));
		let err = decode(EventSchema::InitiatedChallenge, &entry).unwrap_err();
		assert_eq!(err.schema, "InitiatedChallenge");
		assert_eq!(err.address, Address::repeat_byte(0xfa));
	}

	#[test]
	fn test_missing_topics_rejected() {
		let mut entry = rollup_created(Address::repeat_byte(0x33));
		entry.topics.clear();
		assert!(decode(EventSchema::RollupCreated, &entry).is_err());
	}

	#[test]
	fn test_extra_topic_rejected() {
		let mut entry = rollup_created(Address::repeat_byte(0x33));
		entry.topics.push(B256::repeat_byte(1));
		assert!(decode(EventSchema::RollupCreated, &entry).is_err());
	}

	#[test]
	fn test_truncated_payload_rejected() {
		let mut entry = rollup_created(Address::repeat_byte(0x33));
		entry.data = Bytes::from(entry.data[..31].to_vec());
		let err = decode(EventSchema::RollupCreated, &entry).unwrap_err();
		assert_eq!(err.schema, "RollupCreated");
	}

	#[test]
	fn test_non_canonical_payload_rejected() {
		// Trailing word
		let mut entry = rollup_created(Address::repeat_byte(0x33));
		let mut data = entry.data.to_vec();
		data.extend_from_slice(&[0u8; 32]);
		entry.data = Bytes::from(data);
		assert!(decode(EventSchema::RollupCreated, &entry).is_err());

		// Dirty high bytes in an address word
		let mut entry = rollup_created(Address::repeat_byte(0x33));
		let mut data = entry.data.to_vec();
		data[0] = 0xff;
		entry.data = Bytes::from(data);
		assert!(decode(EventSchema::RollupCreated, &entry).is_err());
	}

	#[test]
	fn test_decoding_is_deterministic() {
		let entry = rollup_created(Address::repeat_byte(0x44));
		assert_eq!(
			decode(EventSchema::RollupCreated, &entry).unwrap(),
			decode(EventSchema::RollupCreated, &entry).unwrap()
		);
	}
}
