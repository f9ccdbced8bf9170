//! GraphQL documents used by the storefront.
//!
//! The operation name doubles as the cache namespace, so it must be unique.

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

// Users

pub const CREATE_USER: Operation = Operation {
    name: "CreateUser",
    document: r#"mutation CreateUser($data: CreateUserInput!) {
  createUser(data: $data) {
    id firstName lastName name phone email image rol authType token
  }
}"#,
};

pub const UPDATE_USER: Operation = Operation {
    name: "UpdateUser",
    document: r#"mutation UpdateUser($data: UpdateUserInput!) {
  updateUser(data: $data) {
    id firstName lastName email phone authType rol
  }
}"#,
};

pub const LOGIN_USER: Operation = Operation {
    name: "LoginUser",
    document: r#"query LoginUser($email: String!, $password: String) {
  findUserByEmail(email: $email, password: $password) {
    id firstName lastName name email image rol authType phone token
  }
}"#,
};

pub const FIND_USER_BY_EMAIL: Operation = Operation {
    name: "getUserByEmail",
    document: r#"query getUserByEmail($email: String!) {
  getUserByEmail(email: $email) {
    id firstName lastName name email image rol authType phone token
  }
}"#,
};

// Addresses

pub const GET_ADDRESSES: Operation = Operation {
    name: "GetAddresses",
    document: r#"query GetAddresses {
  getAddresses { id firstName lastName address optAddress city zipCode phone }
}"#,
};

pub const ADD_ADDRESS: Operation = Operation {
    name: "AddAddress",
    document: r#"mutation AddAddress($input: AddressInput!) {
  addAddress(input: $input) { id firstName lastName address optAddress city zipCode phone }
}"#,
};

pub const UPDATE_ADDRESS: Operation = Operation {
    name: "UpdateAddress",
    document: r#"mutation UpdateAddress($id: Int!, $input: UpdateAddressInput!) {
  updateAddress(id: $id, input: $input) { id firstName lastName address optAddress city zipCode phone }
}"#,
};

pub const DELETE_ADDRESS: Operation = Operation {
    name: "DeleteAddress",
    document: r#"mutation DeleteAddress($id: Int!) {
  deleteAddress(id: $id)
}"#,
};

// Facet options

pub const GET_ALL_CATEGORIES: Operation = Operation {
    name: "GetAllCategories",
    document: r#"query GetAllCategories {
  getAllCategories { id name metaTitle metaDescription metaKeywords slug }
}"#,
};

pub const GET_ALL_COLORS: Operation = Operation {
    name: "GetAllColors",
    document: r#"query GetAllColors {
  getAllColors { id color }
}"#,
};

pub const GET_ALL_AGES: Operation = Operation {
    name: "GetAllAges",
    document: r#"query GetAllAges {
  getAllAges { id range }
}"#,
};

pub const GET_ALL_GENRES: Operation = Operation {
    name: "GetAllGenres",
    document: r#"query GetAllGenres {
  getAllGenres { id genre }
}"#,
};

pub const GET_ALL_SIZES: Operation = Operation {
    name: "GetAllSizes",
    document: r#"query GetAllSizes {
  getAllSizes { id size }
}"#,
};

// Products

pub const GET_PRODUCTS_BY_RELATION: Operation = Operation {
    name: "GetProductsByRelation",
    document: r#"query GetProductsByRelation($filterData: [FilterDataInput!]!, $page: Int, $maxPrice: Float, $minPrice: Float, $sortBy: String, $searchTerm: String) {
  findProductsByRelation(filterData: $filterData, page: $page, maxPrice: $maxPrice, minPrice: $minPrice, sortBy: $sortBy, searchTerm: $searchTerm) {
    products { id name price slug description }
    isProducts
  }
}"#,
};

pub const GET_PRODUCT_BY_SLUG: Operation = Operation {
    name: "GetProduct",
    document: r#"query GetProduct($identifier: String!) {
  getProduct(identifier: $identifier) {
    id name slug price description quantity reviewCount
    metaTitle metaDescription metaKeywords
    colors { id color }
    sizes { id size }
    categories { id name slug }
    genres { id genre }
    ages { id range }
    details { id key value }
    images { id imagePath alt sortOrder isMain }
  }
}"#,
};

pub const GET_RELATED_PRODUCTS: Operation = Operation {
    name: "GetRelatedProducts",
    document: r#"query GetRelatedProducts($productId: Int!, $limit: Int = 4) {
  getRelatedProducts(productId: $productId, limit: $limit) { id name slug price description }
}"#,
};

pub const FIND_PRODUCTS_WITH_GENRES: Operation = Operation {
    name: "FindProductsByGenre",
    document: r#"query FindProductsByGenre($id: Int!) {
  findAllProducts(relation: "genre", id: $id) {
    id name price
    genres { id genre }
  }
}"#,
};

pub const FIND_PRODUCTS_WITH_CATEGORIES: Operation = Operation {
    name: "FindProductsByCategory",
    document: r#"query FindProductsByCategory($id: Int!) {
  findAllProducts(relation: "category", id: $id) {
    id name price
    categories { id name }
  }
}"#,
};

// Payments and orders

pub const CREATE_PAYMENT_PREFERENCE: Operation = Operation {
    name: "CrearPreferenciaPago",
    document: r#"mutation CrearPreferenciaPago($input: PreferenciaInput!) {
  crearPreferenciaPago(input: $input) {
    id initPoint sandboxInitPoint autoReturn
    backUrls { success failure pending }
  }
}"#,
};

pub const GET_MY_ORDERS_PAGINATED: Operation = Operation {
    name: "GetMyOrdersPaginated",
    document: r#"query GetMyOrdersPaginated($page: Int, $limit: Int) {
  myOrdersPaginated(page: $page, limit: $limit) {
    orders { id externalReference status total createdAt }
    pagination { currentPage totalPages totalOrders hasNextPage hasPrevPage }
  }
}"#,
};

pub const GET_MY_ORDER_DETAIL: Operation = Operation {
    name: "GetMyOrderDetail",
    document: r#"query GetMyOrderDetail($externalReference: String!) {
  myOrderDetail(externalReference: $externalReference) {
    id externalReference status total subtotal itemsCount createdAt paidAt
    orderItems { id name quantity price selectedColor selectedSize }
    customerInfo { firstName lastName email phone address apartment city province zipCode }
    paymentMethod { id name description }
    mercadoPagoPaymentId
  }
}"#,
};

pub const GET_ALL_ORDERS: Operation = Operation {
    name: "GetAllOrders",
    document: r#"query GetAllOrders($page: Int, $limit: Int) {
  allOrders(page: $page, limit: $limit) {
    orders {
      id externalReference status total createdAt
      orderItems { name quantity price }
    }
    pagination { currentPage totalPages totalOrders hasNextPage hasPrevPage }
  }
}"#,
};
