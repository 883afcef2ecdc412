use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_rlp::{BufMut, Encodable, Header};

const EIP1559_TX_TYPE: u8 = 0x02;
// An empty access list encodes as a single 0xc0 byte.
const EMPTY_ACCESS_LIST_LEN: usize = 1;

/// Unsigned type-2 transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
}

impl Eip1559Transaction {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + EMPTY_ACCESS_LIST_LEN
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        Header {
            list: true,
            payload_length: 0,
        }
        .encode(out);
    }

    /// `0x02 || rlp([chain_id, nonce, ..., access_list])`
    pub fn encode_for_signing(&self) -> Vec<u8> {
        let payload_length = self.fields_len();
        let mut out = Vec::with_capacity(1 + payload_length + 9);
        out.push(EIP1559_TX_TYPE);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        out
    }

    pub fn signing_hash(&self) -> B256 {
        keccak256(self.encode_for_signing())
    }

    /// `0x02 || rlp([chain_id, ..., access_list, y_parity, r, s])`
    pub fn encode_signed(&self, y_parity: bool, r: U256, s: U256) -> Vec<u8> {
        let payload_length = self.fields_len() + y_parity.length() + r.length() + s.length();
        let mut out = Vec::with_capacity(1 + payload_length + 9);
        out.push(EIP1559_TX_TYPE);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        y_parity.encode(&mut out);
        r.encode(&mut out);
        s.encode(&mut out);
        out
    }
}
