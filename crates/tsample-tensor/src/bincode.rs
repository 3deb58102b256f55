use crate::{allocator::TensorAllocator, storage::TensorStorage, Tensor};

impl<T, const N: usize, A: TensorAllocator + 'static> bincode::enc::Encode for Tensor<T, N, A>
where
    T: bincode::enc::Encode,
{
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.shape, encoder)?;
        bincode::Encode::encode(self.as_slice(), encoder)?;
        Ok(())
    }
}

impl<T, const N: usize, A, C> bincode::de::Decode<C> for Tensor<T, N, A>
where
    T: bincode::de::Decode<C>,
    A: TensorAllocator + Default + 'static,
{
    fn decode<D: bincode::de::Decoder<Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let shape: [usize; N] = bincode::Decode::decode(decoder)?;
        let data: Vec<T> = bincode::Decode::decode(decoder)?;

        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(bincode::error::DecodeError::OtherString(format!(
                "Shape {:?} expects {} elements, got {}",
                shape,
                numel,
                data.len()
            )));
        }

        let storage = TensorStorage::from_vec(data, A::default()).map_err(|e| {
            bincode::error::DecodeError::OtherString(format!("Storage error: {}", e))
        })?;

        Ok(Self {
            storage,
            shape,
            strides: crate::get_strides_from_shape(shape),
        })
    }
}

impl<'de, T, const N: usize, A, C> bincode::de::BorrowDecode<'de, C> for Tensor<T, N, A>
where
    T: bincode::de::Decode<C>,
    A: TensorAllocator + Default + 'static,
{
    fn borrow_decode<D: bincode::de::BorrowDecoder<'de, Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        <Self as bincode::de::Decode<C>>::decode(decoder)
    }
}
